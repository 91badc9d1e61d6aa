//! Payment Order Repository (local shadow of gateway orders)

use super::{RepoError, RepoResult};
use shared::models::{ORDER_STATUS_PAID, PaymentOrder};
use sqlx::SqlitePool;

const ORDER_COLUMNS: &str = "id, product_id, buyer_id, amount, currency, receipt, status, payment_id, created_at, updated_at";

pub async fn create(pool: &SqlitePool, order: &PaymentOrder) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO orders (id, product_id, buyer_id, amount, currency, receipt, status, payment_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&order.id)
    .bind(order.product_id)
    .bind(order.buyer_id)
    .bind(order.amount)
    .bind(&order.currency)
    .bind(&order.receipt)
    .bind(&order.status)
    .bind(&order.payment_id)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<PaymentOrder>> {
    let order = sqlx::query_as::<_, PaymentOrder>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(order)
}

/// Newest first
pub async fn find_by_buyer(pool: &SqlitePool, buyer_id: i64) -> RepoResult<Vec<PaymentOrder>> {
    let orders = sqlx::query_as::<_, PaymentOrder>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE buyer_id = ? ORDER BY created_at DESC, id DESC"
    ))
    .bind(buyer_id)
    .fetch_all(pool)
    .await?;
    Ok(orders)
}

/// Record a verified payment against the order
pub async fn mark_paid(pool: &SqlitePool, id: &str, payment_id: &str, now: i64) -> RepoResult<()> {
    let result =
        sqlx::query("UPDATE orders SET status = ?, payment_id = ?, updated_at = ? WHERE id = ?")
            .bind(ORDER_STATUS_PAID)
            .bind(payment_id)
            .bind(now)
            .bind(id)
            .execute(pool)
            .await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("order {id}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{product, test_pool, user};
    use crate::db::{products, users};

    fn order(id: &str, created_at: i64) -> PaymentOrder {
        PaymentOrder {
            id: id.into(),
            product_id: 10,
            buyer_id: 1,
            amount: 30_000,
            currency: "INR".into(),
            receipt: format!("order_10_{created_at}"),
            status: "created".into(),
            payment_id: None,
            created_at,
            updated_at: created_at,
        }
    }

    async fn seeded_pool() -> SqlitePool {
        let pool = test_pool().await;
        users::create_with_wishlist(&pool, &user(1, "a@college.edu"))
            .await
            .unwrap();
        products::create(&pool, &product(10, 1, "Physics Textbook", 300.0, 1_000))
            .await
            .unwrap();
        pool
    }

    #[tokio::test]
    async fn test_mark_paid_records_payment_id() {
        let pool = seeded_pool().await;
        create(&pool, &order("order_A", 1)).await.unwrap();
        mark_paid(&pool, "order_A", "pay_1", 5).await.unwrap();

        let stored = find_by_id(&pool, "order_A").await.unwrap().unwrap();
        assert_eq!(stored.status, ORDER_STATUS_PAID);
        assert_eq!(stored.payment_id.as_deref(), Some("pay_1"));
        assert_eq!(stored.updated_at, 5);
    }

    #[tokio::test]
    async fn test_mark_paid_unknown_order() {
        let pool = seeded_pool().await;
        let err = mark_paid(&pool, "order_missing", "pay_1", 5).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_find_by_buyer_newest_first() {
        let pool = seeded_pool().await;
        create(&pool, &order("order_A", 1)).await.unwrap();
        create(&pool, &order("order_B", 2)).await.unwrap();
        let ids: Vec<String> = find_by_buyer(&pool, 1)
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec!["order_B", "order_A"]);
    }
}
