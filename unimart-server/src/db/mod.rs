//! Database Module
//!
//! SQLite connection pool, migrations and the repository functions.

pub mod orders;
pub mod products;
pub mod users;
pub mod wishlists;

use shared::error::{AppError, ErrorCode};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound("row".into()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Duplicate(db.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(what) => AppError::not_found(what),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => {
                tracing::error!(error = %msg, "Repository database error");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Database service owning the SQLite connection pool
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Open (or create) the database at `url` with WAL and foreign keys, then migrate
    pub async fn new(url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| AppError::database(format!("Invalid database url: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        tracing::info!("Database connection established (SQLite WAL, busy_timeout=5000ms)");

        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    /// Private in-memory database with the full schema.
    ///
    /// A single connection that is never recycled, otherwise every new
    /// connection would see a fresh empty database.
    pub async fn in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::database(format!("Invalid database url: {e}")))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    async fn migrate(pool: &SqlitePool) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::info!("Database migrations applied");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use shared::models::{DEFAULT_LOCATION, DEFAULT_PRODUCT_RATING, Product, User};

    pub async fn test_pool() -> SqlitePool {
        DbService::in_memory().await.unwrap().pool
    }

    pub fn user(id: i64, email: &str) -> User {
        User {
            id,
            email: email.into(),
            name: format!("User {id}"),
            department: "Physics".into(),
            year: "2".into(),
            hashed_password: "x".into(),
            avatar: "https://i.pravatar.cc/150?u=test".into(),
            location: DEFAULT_LOCATION.into(),
            joined_at: 0,
            rating: 4.5,
            total_sales: 3,
            total_purchases: 0,
            is_profile_complete: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    pub fn product(id: i64, seller_id: i64, title: &str, price: f64, created_at: i64) -> Product {
        Product {
            id,
            title: title.into(),
            description: format!("{title} in good shape"),
            price,
            image: "/uploads/abc.jpg".into(),
            images: vec![],
            category: "Textbooks".into(),
            subject: "Physics".into(),
            condition: "Good".into(),
            seller_id,
            seller_name: format!("User {seller_id}"),
            rating: DEFAULT_PRODUCT_RATING,
            is_blockchain_verified: false,
            location: DEFAULT_LOCATION.into(),
            created_at,
            updated_at: created_at,
        }
    }
}
