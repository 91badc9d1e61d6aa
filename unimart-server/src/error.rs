//! Unified service-layer error type
//!
//! `ServiceError` bridges infrastructure errors (`sqlx::Error`, hashing,
//! token signing, file IO) and the API-layer error (`AppError`), so handlers
//! and services can use `?` throughout.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

use crate::db::RepoError;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Service-layer error
///
/// - `Infra`: infrastructure failures (auto-logged, mapped to InternalError)
/// - `App`: business-rule errors (transparent pass-through to client)
#[derive(Debug)]
pub enum ServiceError {
    Infra(BoxError),
    App(AppError),
}

impl ServiceError {
    pub fn infra(e: impl std::error::Error + Send + Sync + 'static) -> Self {
        ServiceError::Infra(Box::new(e))
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Infra(e.into())
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Infra(e)
    }
}

impl From<RepoError> for ServiceError {
    fn from(e: RepoError) -> Self {
        ServiceError::App(e.into())
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ErrorCode> for ServiceError {
    fn from(code: ErrorCode) -> Self {
        ServiceError::App(AppError::new(code))
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Infra(err) => {
                tracing::error!(error = %err, "Service infrastructure error");
                AppError::new(ErrorCode::InternalError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;
