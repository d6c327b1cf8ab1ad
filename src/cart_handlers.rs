use actix_web::{delete, get, post, web, HttpResponse};
use serde_json::json;
use tracing::info;

use crate::cart::CartStore;
use crate::error::ApiError;
use crate::models::{AddToCartRequest, RemoveFromCartRequest, UsernameQuery};

fn require_username(query: &UsernameQuery) -> Result<&str, ApiError> {
    query
        .username
        .as_deref()
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::Validation("Missing username query parameter".to_string()))
}

#[get("/api/cart")]
pub async fn view_cart(
    query: web::Query<UsernameQuery>,
    carts: web::Data<CartStore>,
) -> Result<HttpResponse, ApiError> {
    let username = require_username(&query)?;
    let cart = carts
        .get(username)?
        .ok_or_else(|| ApiError::CartNotFound(username.to_string()))?;
    Ok(HttpResponse::Ok().json(cart))
}

/// Buys a candidate site into the user's cart, deducting the cost from the
/// virtual budget. Responds with the updated cart.
#[post("/api/cart/add")]
pub async fn add_to_cart(
    body: web::Json<AddToCartRequest>,
    carts: web::Data<CartStore>,
) -> Result<HttpResponse, ApiError> {
    let AddToCartRequest {
        username,
        item,
        cost,
    } = body.into_inner();
    if username.is_empty() {
        return Err(ApiError::Validation("Username required".to_string()));
    }
    let cart = carts.add(&username, item, cost)?;
    info!(username = %username, money_left = cart.money_left, "added item to cart");
    Ok(HttpResponse::Ok().json(cart))
}

#[post("/api/cart/remove")]
pub async fn remove_from_cart(
    body: web::Json<RemoveFromCartRequest>,
    carts: web::Data<CartStore>,
) -> Result<HttpResponse, ApiError> {
    let RemoveFromCartRequest { username, index } = body.into_inner();
    if username.is_empty() {
        return Err(ApiError::Validation("Username required".to_string()));
    }
    let cart = carts.remove_at(&username, index)?;
    Ok(HttpResponse::Ok().json(cart))
}

#[delete("/api/cart")]
pub async fn clear_cart(
    query: web::Query<UsernameQuery>,
    carts: web::Data<CartStore>,
) -> Result<HttpResponse, ApiError> {
    let username = require_username(&query)?;
    carts.delete(username)?;
    info!(username = %username, "deleted cart");
    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Cart deleted",
    })))
}
