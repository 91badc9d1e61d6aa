//! Wishlist API (all routes authenticated)

use axum::{
    Extension, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};
use shared::error::AppError;
use shared::models::{Product, WishlistAdd, WishlistCleared};

use crate::api::extract::Json;
use crate::auth::CurrentUser;
use crate::services::wishlist;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/wishlist",
            get(get_wishlist).post(add_to_wishlist).delete(clear_wishlist),
        )
        .route("/wishlist/{product_id}", delete(remove_from_wishlist))
}

async fn get_wishlist(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(wishlist::get(&state, user.id).await?))
}

async fn add_to_wishlist(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<WishlistAdd>,
) -> Result<(StatusCode, Json<Vec<Product>>), AppError> {
    let products = wishlist::add(&state, user.id, req.product_id).await?;
    Ok((StatusCode::CREATED, Json(products)))
}

async fn remove_from_wishlist(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(product_id): Path<String>,
) -> Result<Json<Vec<Product>>, AppError> {
    // A malformed id cannot be in the wishlist, so removal is a no-op
    let products = wishlist::remove(&state, user.id, product_id.parse().ok()).await?;
    Ok(Json(products))
}

async fn clear_wishlist(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<WishlistCleared>, AppError> {
    wishlist::clear(&state, user.id).await?;
    Ok(Json(WishlistCleared::default()))
}
