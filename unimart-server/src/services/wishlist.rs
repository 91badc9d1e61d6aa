//! Wishlist management
//!
//! Every user gets a wishlist at registration; reads never create one.

use shared::error::ErrorCode;
use shared::models::Product;

use crate::db::{products, wishlists};
use crate::error::ServiceResult;
use crate::state::AppState;

async fn require_wishlist(state: &AppState, user_id: i64) -> ServiceResult<()> {
    if !wishlists::exists(&state.pool, user_id).await? {
        return Err(ErrorCode::WishlistNotFound.into());
    }
    Ok(())
}

pub async fn get(state: &AppState, user_id: i64) -> ServiceResult<Vec<Product>> {
    require_wishlist(state, user_id).await?;
    Ok(wishlists::find_products(&state.pool, user_id).await?)
}

/// Add a product; conflict when it is already listed
pub async fn add(state: &AppState, user_id: i64, product_id: i64) -> ServiceResult<Vec<Product>> {
    if products::find_by_id(&state.pool, product_id).await?.is_none() {
        return Err(ErrorCode::ProductNotFound.into());
    }

    // Accounts that predate provisioning get their wishlist here
    wishlists::ensure(&state.pool, user_id).await?;

    if !wishlists::add_item(&state.pool, user_id, product_id).await? {
        return Err(ErrorCode::WishlistDuplicate.into());
    }

    tracing::info!(user_id, product_id, "Product added to wishlist");
    Ok(wishlists::find_products(&state.pool, user_id).await?)
}

/// Remove a product; absent ids are a no-op
pub async fn remove(
    state: &AppState,
    user_id: i64,
    product_id: Option<i64>,
) -> ServiceResult<Vec<Product>> {
    require_wishlist(state, user_id).await?;
    if let Some(product_id) = product_id {
        wishlists::remove_item(&state.pool, user_id, product_id).await?;
    }
    Ok(wishlists::find_products(&state.pool, user_id).await?)
}

pub async fn clear(state: &AppState, user_id: i64) -> ServiceResult<()> {
    require_wishlist(state, user_id).await?;
    wishlists::clear(&state.pool, user_id).await?;
    tracing::info!(user_id, "Wishlist cleared");
    Ok(())
}
