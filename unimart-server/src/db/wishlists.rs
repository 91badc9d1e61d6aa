//! Wishlist Repository
//!
//! One wishlist row per user, items keyed by (user_id, product_id).

use super::RepoResult;
use shared::models::Product;
use sqlx::SqlitePool;

pub async fn exists(pool: &SqlitePool, user_id: i64) -> RepoResult<bool> {
    let found: Option<i64> =
        sqlx::query_scalar("SELECT user_id FROM wishlists WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    Ok(found.is_some())
}

/// Provision the wishlist row if missing (idempotent)
pub async fn ensure(pool: &SqlitePool, user_id: i64) -> RepoResult<()> {
    sqlx::query("INSERT OR IGNORE INTO wishlists (user_id, created_at) VALUES (?, ?)")
        .bind(user_id)
        .bind(shared::util::now_millis())
        .execute(pool)
        .await?;
    Ok(())
}

/// Atomic add-if-absent. Returns `false` when the product was already listed.
pub async fn add_item(pool: &SqlitePool, user_id: i64, product_id: i64) -> RepoResult<bool> {
    let result = sqlx::query(
        "INSERT OR IGNORE INTO wishlist_items (user_id, product_id, added_at) VALUES (?, ?, ?)",
    )
    .bind(user_id)
    .bind(product_id)
    .bind(shared::util::now_millis())
    .execute(pool)
    .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn remove_item(pool: &SqlitePool, user_id: i64, product_id: i64) -> RepoResult<()> {
    sqlx::query("DELETE FROM wishlist_items WHERE user_id = ? AND product_id = ?")
        .bind(user_id)
        .bind(product_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn clear(pool: &SqlitePool, user_id: i64) -> RepoResult<()> {
    sqlx::query("DELETE FROM wishlist_items WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Wishlisted products in insertion order
pub async fn find_products(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(
        "SELECT p.id, p.title, p.description, p.price, p.image, p.images, p.category, p.subject, p.condition, p.seller_id, p.seller_name, p.rating, p.is_blockchain_verified, p.location, p.created_at, p.updated_at FROM wishlist_items wi JOIN products p ON p.id = wi.product_id WHERE wi.user_id = ? ORDER BY wi.added_at ASC, wi.id ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{product, test_pool, user};
    use crate::db::{products, users};

    async fn seeded_pool() -> SqlitePool {
        let pool = test_pool().await;
        users::create_with_wishlist(&pool, &user(1, "a@college.edu"))
            .await
            .unwrap();
        products::create(&pool, &product(10, 1, "Physics Textbook", 300.0, 1_000))
            .await
            .unwrap();
        products::create(&pool, &product(11, 1, "Calculator", 900.0, 2_000))
            .await
            .unwrap();
        pool
    }

    #[tokio::test]
    async fn test_add_twice_reports_duplicate() {
        let pool = seeded_pool().await;
        assert!(add_item(&pool, 1, 10).await.unwrap());
        assert!(!add_item(&pool, 1, 10).await.unwrap());
        assert_eq!(find_products(&pool, 1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_items_keep_insertion_order() {
        let pool = seeded_pool().await;
        add_item(&pool, 1, 11).await.unwrap();
        add_item(&pool, 1, 10).await.unwrap();
        let ids: Vec<i64> = find_products(&pool, 1)
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![11, 10]);
    }

    #[tokio::test]
    async fn test_remove_absent_is_noop() {
        let pool = seeded_pool().await;
        add_item(&pool, 1, 10).await.unwrap();
        remove_item(&pool, 1, 11).await.unwrap();
        assert_eq!(find_products(&pool, 1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_keeps_wishlist_row() {
        let pool = seeded_pool().await;
        add_item(&pool, 1, 10).await.unwrap();
        clear(&pool, 1).await.unwrap();
        assert!(find_products(&pool, 1).await.unwrap().is_empty());
        assert!(exists(&pool, 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_ensure_is_idempotent() {
        let pool = seeded_pool().await;
        ensure(&pool, 1).await.unwrap();
        ensure(&pool, 1).await.unwrap();
        assert!(exists(&pool, 1).await.unwrap());
    }
}
