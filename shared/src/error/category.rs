//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Authentication errors
/// - 2xxx: User errors
/// - 3xxx: Product errors
/// - 4xxx: Wishlist errors
/// - 5xxx: Payment errors
/// - 6xxx: Upload errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// User errors (2xxx)
    User,
    /// Product errors (3xxx)
    Product,
    /// Wishlist errors (4xxx)
    Wishlist,
    /// Payment errors (5xxx)
    Payment,
    /// Upload errors (6xxx)
    Upload,
    /// System errors (9xxx and anything unassigned)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            2000..3000 => Self::User,
            3000..4000 => Self::Product,
            4000..5000 => Self::Wishlist,
            5000..6000 => Self::Payment,
            6000..7000 => Self::Upload,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::User => "user",
            Self::Product => "product",
            Self::Wishlist => "wishlist",
            Self::Payment => "payment",
            Self::Upload => "upload",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
