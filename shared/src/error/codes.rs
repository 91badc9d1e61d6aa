//! Unified error codes for UniMart
//!
//! This module defines all error codes shared by the API server and its clients.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: User errors
//! - 3xxx: Product errors
//! - 4xxx: Wishlist errors
//! - 5xxx: Payment errors
//! - 6xxx: Upload errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Too many requests from the same client
    TooManyRequests = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Password shorter than the minimum length
    PasswordTooShort = 1005,

    // ==================== 2xxx: User ====================
    /// User not found
    UserNotFound = 2001,
    /// Email is already registered
    EmailAlreadyRegistered = 2002,
    /// Email address is malformed
    InvalidEmail = 2003,

    // ==================== 3xxx: Product ====================
    /// Product not found
    ProductNotFound = 3001,
    /// Product price is not a positive number
    ProductInvalidPrice = 3002,

    // ==================== 4xxx: Wishlist ====================
    /// Wishlist not found
    WishlistNotFound = 4001,
    /// Product already in wishlist
    WishlistDuplicate = 4002,

    // ==================== 5xxx: Payment ====================
    /// Shadow order not found
    OrderNotFound = 5001,
    /// Payment gateway credentials missing
    PaymentGatewayNotConfigured = 5002,
    /// Payment gateway call failed
    PaymentGatewayError = 5003,
    /// Payment signature did not verify
    PaymentVerificationFailed = 5004,

    // ==================== 6xxx: Upload ====================
    /// File too large
    FileTooLarge = 6001,
    /// Unsupported file format
    UnsupportedFileFormat = 6002,
    /// Invalid image file
    InvalidImageFile = 6003,
    /// Empty file
    EmptyFile = 6005,
    /// Image processing failed
    ImageProcessingFailed = 6006,
    /// File storage failed
    FileStorageFailed = 6007,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::TooManyRequests => "Too many requests, try again later",

            // Auth
            ErrorCode::NotAuthenticated => "Not authorized, no token",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Not authorized, token failed",
            ErrorCode::PasswordTooShort => "Password must be at least 6 characters",

            // User
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::EmailAlreadyRegistered => "User already exists",
            ErrorCode::InvalidEmail => "Please use a valid email address",

            // Product
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductInvalidPrice => "Price must be a positive number",

            // Wishlist
            ErrorCode::WishlistNotFound => "Wishlist not found",
            ErrorCode::WishlistDuplicate => "Product already in wishlist",

            // Payment
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::PaymentGatewayNotConfigured => "Payment gateway not configured properly",
            ErrorCode::PaymentGatewayError => "Failed to create payment order",
            ErrorCode::PaymentVerificationFailed => "Payment verification failed",

            // Upload
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::InvalidImageFile => "Invalid image file",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::ImageProcessingFailed => "Image processing failed",
            ErrorCode::FileStorageFailed => "File storage failed",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            9 => Ok(ErrorCode::TooManyRequests),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::PasswordTooShort),

            // User
            2001 => Ok(ErrorCode::UserNotFound),
            2002 => Ok(ErrorCode::EmailAlreadyRegistered),
            2003 => Ok(ErrorCode::InvalidEmail),

            // Product
            3001 => Ok(ErrorCode::ProductNotFound),
            3002 => Ok(ErrorCode::ProductInvalidPrice),

            // Wishlist
            4001 => Ok(ErrorCode::WishlistNotFound),
            4002 => Ok(ErrorCode::WishlistDuplicate),

            // Payment
            5001 => Ok(ErrorCode::OrderNotFound),
            5002 => Ok(ErrorCode::PaymentGatewayNotConfigured),
            5003 => Ok(ErrorCode::PaymentGatewayError),
            5004 => Ok(ErrorCode::PaymentVerificationFailed),

            // Upload
            6001 => Ok(ErrorCode::FileTooLarge),
            6002 => Ok(ErrorCode::UnsupportedFileFormat),
            6003 => Ok(ErrorCode::InvalidImageFile),
            6005 => Ok(ErrorCode::EmptyFile),
            6006 => Ok(ErrorCode::ImageProcessingFailed),
            6007 => Ok(ErrorCode::FileStorageFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
