//! Session tokens, the authentication middleware and rate limiting

pub mod rate_limit;
pub mod user_auth;

pub use user_auth::{CurrentUser, create_token, require_auth};
