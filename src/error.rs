use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Every failure a handler can surface, mapped onto an HTTP status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("No session cookie found, please login")]
    MissingSession,

    #[error("Invalid or expired session")]
    InvalidSession,

    #[error("User already exists")]
    UserExists,

    #[error("No property found at the specified coordinates")]
    LocationNotFound,

    #[error("No cart found for user {0}")]
    CartNotFound(String),

    #[error("Insufficient funds: available {available:.2}, cost {cost:.2}")]
    InsufficientFunds { available: f64, cost: f64 },

    #[error("Invalid item index {index}")]
    InvalidIndex { index: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Internal state lock poisoned")]
    Poisoned,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::InsufficientFunds { .. }
            | ApiError::InvalidIndex { .. } => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials
            | ApiError::MissingSession
            | ApiError::InvalidSession => StatusCode::UNAUTHORIZED,
            ApiError::LocationNotFound | ApiError::CartNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::UserExists => StatusCode::CONFLICT,
            ApiError::Io(_) | ApiError::Json(_) | ApiError::Hash(_) | ApiError::Poisoned => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "status": "error",
            "message": self.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_error_categories() {
        assert_eq!(
            ApiError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::UserExists.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::LocationNotFound.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Poisoned.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_body_is_json_with_message() {
        let resp = ApiError::UserExists.error_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }
}
