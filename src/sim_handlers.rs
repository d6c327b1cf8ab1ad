use actix_web::{get, web, HttpResponse};

use crate::cart::CartStore;
use crate::error::ApiError;
use crate::models::UsernameQuery;
use crate::simulation;

/// Runs the climate projection for a user's cart. A user with no cart gets
/// the empty-cart projection rather than an error.
#[get("/api/simulation")]
pub async fn simulate(
    query: web::Query<UsernameQuery>,
    carts: web::Data<CartStore>,
) -> Result<HttpResponse, ApiError> {
    let username = query
        .username
        .as_deref()
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::Validation("Missing username query parameter".to_string()))?;

    let items = carts
        .get(username)?
        .map(|cart| cart.items)
        .unwrap_or_default();
    Ok(HttpResponse::Ok().json(simulation::project(username, &items)))
}
