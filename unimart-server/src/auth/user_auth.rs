//! User JWT authentication
//!
//! Tokens are HS256 JWTs whose `sub` is the user id. The global
//! [`require_auth`] middleware guards every `/api/` route except the public
//! ones and attaches a [`CurrentUser`] to the request.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::Method;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use crate::db::users;
use crate::state::AppState;

/// JWT claims for user sessions
#[derive(Debug, Serialize, Deserialize)]
pub struct UserClaims {
    /// User ID
    pub sub: String,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated user, resolved from the token and still present in the store
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub name: String,
    pub email: String,
}

const JWT_EXPIRY_DAYS: i64 = 30;

/// Create a session token for a user
pub fn create_token(user_id: i64, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = UserClaims {
        sub: user_id.to_string(),
        exp: (now + chrono::Duration::days(JWT_EXPIRY_DAYS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Decode and validate a session token, returning the user id
pub fn decode_token(token: &str, secret: &str) -> Result<i64, AppError> {
    let token_data = jsonwebtoken::decode::<UserClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::new(ErrorCode::TokenExpired),
        _ => {
            tracing::debug!("JWT validation failed: {e}");
            AppError::invalid_token()
        }
    })?;

    token_data
        .claims
        .sub
        .parse()
        .map_err(|_| AppError::invalid_token())
}

/// Routes reachable without a token
fn is_public_route(method: &Method, path: &str) -> bool {
    match (method, path) {
        (&Method::POST, "/api/users" | "/api/users/login") => true,
        (&Method::GET, "/api/products") => true,
        (&Method::GET, _) => path
            .strip_prefix("/api/products/")
            .is_some_and(|rest| !rest.is_empty() && rest != "seller" && !rest.contains('/')),
        _ => false,
    }
}

/// Require authentication middleware
///
/// Extracts and validates the bearer token, checks the user still exists
/// and adds the [`CurrentUser`] to the request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // CORS preflight
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // Non-API routes (health, uploads) are public
    let path = req.uri().path();
    if !path.starts_with("/api/") || is_public_route(req.method(), path) {
        return Ok(next.run(req).await);
    }

    let token = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let Some(token) = token else {
        tracing::warn!(uri = ?req.uri(), "Missing bearer token");
        return Err(AppError::not_authenticated());
    };

    let user_id = decode_token(token, &state.jwt_secret)?;

    let user = users::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!(user_id, "Token for unknown user");
            AppError::invalid_token()
        })?;

    tracing::debug!(user_id = user.id, "User authenticated");

    req.extensions_mut().insert(CurrentUser {
        id: user.id,
        name: user.name,
        email: user.email,
    });
    Ok(next.run(req).await)
}
