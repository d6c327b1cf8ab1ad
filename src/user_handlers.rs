use actix_web::{cookie::Cookie, get, post, web, HttpRequest, HttpResponse};
use serde_json::json;
use tracing::info;

use crate::error::ApiError;
use crate::models::Credentials;
use crate::sessions::SessionStore;
use crate::users::UserStore;

const SESSION_COOKIE: &str = "session_id";

#[post("/register")]
pub async fn register(
    creds: web::Json<Credentials>,
    users: web::Data<UserStore>,
) -> Result<HttpResponse, ApiError> {
    if creds.username.is_empty() || creds.password.is_empty() {
        return Err(ApiError::Validation(
            "Username and password required".to_string(),
        ));
    }
    users.register(&creds.username, &creds.password)?;
    info!(username = %creds.username, "registered new user");
    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "User registered successfully!",
    })))
}

/// Verifies credentials, then hands back a session token both as an HttpOnly
/// cookie and in the body for clients that store it themselves.
#[post("/login")]
pub async fn login(
    creds: web::Json<Credentials>,
    users: web::Data<UserStore>,
    sessions: web::Data<SessionStore>,
) -> Result<HttpResponse, ApiError> {
    users.verify(&creds.username, &creds.password)?;
    let token = sessions.create(&creds.username)?;
    info!(username = %creds.username, "logged in");

    let cookie = Cookie::build(SESSION_COOKIE, token.clone())
        .http_only(true)
        .path("/")
        .finish();
    Ok(HttpResponse::Ok().cookie(cookie).json(json!({
        "status": "success",
        "message": "Logged in!",
        "session_id": token,
    })))
}

#[get("/profile")]
pub async fn profile(
    req: HttpRequest,
    sessions: web::Data<SessionStore>,
) -> Result<HttpResponse, ApiError> {
    let cookie = req.cookie(SESSION_COOKIE).ok_or(ApiError::MissingSession)?;
    let username = sessions.resolve(cookie.value())?;
    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "profile": format!("Hello {username}! This is protected profile data!"),
    })))
}

/// Destroys the session and expires the cookie. Requires the cookie to be
/// present; destroying an already-dead token still succeeds.
#[post("/logout")]
pub async fn logout(
    req: HttpRequest,
    sessions: web::Data<SessionStore>,
) -> Result<HttpResponse, ApiError> {
    let cookie = req.cookie(SESSION_COOKIE).ok_or(ApiError::MissingSession)?;
    sessions.destroy(cookie.value())?;

    let mut removal = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    removal.make_removal();
    Ok(HttpResponse::Ok().cookie(removal).json(json!({
        "status": "success",
        "message": "Logged out successfully!",
    })))
}
