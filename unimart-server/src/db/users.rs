//! User Repository

use super::{RepoError, RepoResult};
use shared::models::User;
use sqlx::SqlitePool;

const USER_COLUMNS: &str = "id, email, name, department, year, hashed_password, avatar, location, joined_at, rating, total_sales, total_purchases, is_profile_complete, created_at, updated_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Lookup by the normalized (lower-cased) email
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<User>> {
    let user =
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
            .bind(email)
            .fetch_optional(pool)
            .await?;
    Ok(user)
}

/// Insert a user and provision its (empty) wishlist in one transaction.
///
/// Fails with `Duplicate` when the email is already registered.
pub async fn create_with_wishlist(pool: &SqlitePool, user: &User) -> RepoResult<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO users (id, email, name, department, year, hashed_password, avatar, location, joined_at, rating, total_sales, total_purchases, is_profile_complete, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(user.id)
    .bind(&user.email)
    .bind(&user.name)
    .bind(&user.department)
    .bind(&user.year)
    .bind(&user.hashed_password)
    .bind(&user.avatar)
    .bind(&user.location)
    .bind(user.joined_at)
    .bind(user.rating)
    .bind(user.total_sales)
    .bind(user.total_purchases)
    .bind(user.is_profile_complete)
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(&mut *tx)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => RepoError::Duplicate(format!("email {}", user.email)),
        other => other,
    })?;

    sqlx::query("INSERT INTO wishlists (user_id, created_at) VALUES (?, ?)")
        .bind(user.id)
        .bind(user.created_at)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// Persist the mutable profile fields of `user`
pub async fn update_profile(pool: &SqlitePool, user: &User) -> RepoResult<()> {
    let result = sqlx::query(
        "UPDATE users SET name = ?, department = ?, year = ?, location = ?, avatar = ?, hashed_password = ?, is_profile_complete = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&user.name)
    .bind(&user.department)
    .bind(&user.year)
    .bind(&user.location)
    .bind(&user.avatar)
    .bind(&user.hashed_password)
    .bind(user.is_profile_complete)
    .bind(user.updated_at)
    .bind(user.id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("user {}", user.id)));
    }
    Ok(())
}
