//! Data models
//!
//! Shared between the API server and its clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes except gateway order ids.

pub mod order;
pub mod product;
pub mod user;
pub mod wishlist;

// Re-exports
pub use order::*;
pub use product::*;
pub use user::*;
pub use wishlist::*;
