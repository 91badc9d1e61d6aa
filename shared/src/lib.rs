//! Shared types for UniMart
//!
//! Domain models, the unified error system and small utilities used by the
//! API server and its clients.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCode};
