//! Registration, login and profile management

use shared::error::{AppError, ErrorCode};
use shared::models::{
    AuthResponse, DEFAULT_LOCATION, LoginRequest, ProfileUpdate, ProfileUpdateResponse,
    RegisterRequest, User, UserProfile,
};
use shared::util::{now_millis, snowflake_id};

use crate::auth::create_token;
use crate::db::{RepoError, users};
use crate::error::{ServiceError, ServiceResult};
use crate::state::AppState;
use crate::util::{hash_password, is_valid_email, placeholder_avatar, verify_password};

pub const MIN_PASSWORD_LEN: usize = 6;

const DEFAULT_USER_RATING: f64 = 5.0;

fn require<'a>(field: &str, value: &'a str) -> Result<&'a str, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::required(field));
    }
    Ok(trimmed)
}

fn check_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::new(ErrorCode::PasswordTooShort));
    }
    Ok(())
}

fn issue_token(state: &AppState, user_id: i64) -> ServiceResult<String> {
    create_token(user_id, &state.jwt_secret).map_err(ServiceError::infra)
}

pub async fn register(state: &AppState, req: RegisterRequest) -> ServiceResult<AuthResponse> {
    let name = require("name", &req.name)?;
    let email = require("email", &req.email)?.to_lowercase();
    if req.password.is_empty() {
        return Err(AppError::required("password").into());
    }
    let password = req.password.as_str();
    let department = require("department", &req.department)?;
    let year = require("year", &req.year)?;

    if !is_valid_email(&email) {
        return Err(AppError::new(ErrorCode::InvalidEmail).with_detail("field", "email").into());
    }
    check_password(password)?;

    if users::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(ErrorCode::EmailAlreadyRegistered.into());
    }

    let avatar = req
        .avatar
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(String::from)
        .unwrap_or_else(|| placeholder_avatar(name));

    let now = now_millis();
    let mut user = User {
        id: snowflake_id(),
        email,
        name: name.to_string(),
        department: department.to_string(),
        year: year.to_string(),
        hashed_password: hash_password(password).map_err(ServiceError::infra)?,
        avatar,
        location: DEFAULT_LOCATION.to_string(),
        joined_at: now,
        rating: DEFAULT_USER_RATING,
        total_sales: 0,
        total_purchases: 0,
        is_profile_complete: false,
        created_at: now,
        updated_at: now,
    };
    user.is_profile_complete = user.compute_profile_complete();

    // A concurrent registration can still win the race on the unique index
    users::create_with_wishlist(&state.pool, &user)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => ErrorCode::EmailAlreadyRegistered.into(),
            other => ServiceError::from(other),
        })?;

    tracing::info!(user_id = user.id, "User registered");

    let token = issue_token(state, user.id)?;
    Ok(AuthResponse::new(&user, token))
}

pub async fn login(state: &AppState, req: LoginRequest) -> ServiceResult<AuthResponse> {
    let email = require("email", &req.email)?.to_lowercase();
    if req.password.is_empty() {
        return Err(AppError::required("password").into());
    }

    // Unknown email and wrong password are indistinguishable to the caller
    let user = match users::find_by_email(&state.pool, &email).await? {
        Some(user) if verify_password(&req.password, &user.hashed_password) => user,
        _ => {
            tracing::warn!("Failed login attempt");
            return Err(AppError::invalid_credentials().into());
        }
    };

    tracing::info!(user_id = user.id, "User logged in");

    let token = issue_token(state, user.id)?;
    Ok(AuthResponse::new(&user, token))
}

pub async fn profile(state: &AppState, user_id: i64) -> ServiceResult<UserProfile> {
    let user = users::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(ErrorCode::UserNotFound)?;
    Ok(user.profile())
}

pub async fn update_profile(
    state: &AppState,
    user_id: i64,
    update: ProfileUpdate,
) -> ServiceResult<ProfileUpdateResponse> {
    let mut user = users::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(ErrorCode::UserNotFound)?;

    apply_profile_update(&mut user, update)?;
    user.updated_at = now_millis();
    users::update_profile(&state.pool, &user).await?;

    tracing::info!(
        user_id = user.id,
        is_profile_complete = user.is_profile_complete,
        "Profile updated"
    );

    let token = issue_token(state, user.id)?;
    Ok(ProfileUpdateResponse::new(&user, token))
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Merge the non-empty fields of `update` into `user` and recompute completeness
pub fn apply_profile_update(user: &mut User, update: ProfileUpdate) -> ServiceResult<()> {
    if let Some(name) = present(update.name) {
        user.name = name;
    }
    if let Some(department) = present(update.department) {
        user.department = department;
    }
    if let Some(year) = present(update.year) {
        user.year = year;
    }
    if let Some(location) = present(update.location) {
        user.location = location;
    }
    if let Some(avatar) = present(update.avatar) {
        user.avatar = resolve_avatar(avatar, &user.name);
    }
    if let Some(password) = update.password.filter(|p| !p.is_empty()) {
        check_password(&password)?;
        user.hashed_password = hash_password(&password).map_err(ServiceError::infra)?;
    }

    user.is_profile_complete = user.compute_profile_complete();
    Ok(())
}

/// Data URIs are stored verbatim; anything that is not an absolute URL
/// becomes a placeholder seeded by the whitespace-free name
fn resolve_avatar(avatar: String, name: &str) -> String {
    if avatar.starts_with("data:") || url::Url::parse(&avatar).is_ok() {
        return avatar;
    }
    let seed: String = name.chars().filter(|c| !c.is_whitespace()).collect();
    placeholder_avatar(&seed)
}
