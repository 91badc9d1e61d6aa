//! User API: registration, login, logout and profile

use axum::{
    Extension, Router,
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
};
use shared::error::AppError;
use shared::models::{
    AuthResponse, LoginRequest, ProfileUpdate, ProfileUpdateResponse, RegisterRequest, UserProfile,
};

use crate::api::extract::Json;
use crate::auth::CurrentUser;
use crate::auth::rate_limit::{login_rate_limit, register_rate_limit};
use crate::services::account;
use crate::state::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            post(register).layer(middleware::from_fn_with_state(
                state.clone(),
                register_rate_limit,
            )),
        )
        .route(
            "/users/login",
            post(login).layer(middleware::from_fn_with_state(state, login_rate_limit)),
        )
        .route("/users/logout", post(logout))
        .route("/users/profile", get(get_profile).put(update_profile))
}

/// POST /api/users
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let resp = account::register(&state, req).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

/// POST /api/users/login
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    Ok(Json(account::login(&state, req).await?))
}

/// POST /api/users/logout. Tokens are stateless; the client drops its copy
async fn logout(Extension(user): Extension<CurrentUser>) -> Json<serde_json::Value> {
    tracing::info!(user_id = user.id, "User logged out");
    Json(serde_json::json!({
        "success": true,
        "message": "Logged out successfully",
    }))
}

/// GET /api/users/profile
async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(account::profile(&state, user.id).await?))
}

/// PUT /api/users/profile
async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<ProfileUpdateResponse>, AppError> {
    Ok(Json(account::update_profile(&state, user.id, update).await?))
}
