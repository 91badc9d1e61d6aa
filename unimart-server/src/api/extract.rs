//! Request extractors that reject with the API error body
//!
//! axum's own `Json`, `Multipart` and `Query` reject with plain-text
//! responses. These wrappers keep their parsing and turn every rejection
//! into an [`AppError`], so clients always see `{code, message, details}`.

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::error::{AppError, ErrorCode};

/// JSON body extractor and response
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Json(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    let code = match &rejection {
        JsonRejection::JsonDataError(_) => ErrorCode::ValidationFailed,
        JsonRejection::JsonSyntaxError(_) => ErrorCode::InvalidFormat,
        _ => ErrorCode::InvalidRequest,
    };
    tracing::debug!(status = %rejection.status(), error = %rejection.body_text(), "Rejected JSON body");
    AppError::with_message(code, rejection.body_text())
}

/// Multipart form extractor
pub struct Multipart(pub axum::extract::Multipart);

impl<S> FromRequest<S> for Multipart
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        axum::extract::Multipart::from_request(req, state)
            .await
            .map(Multipart)
            .map_err(|rejection: MultipartRejection| {
                AppError::invalid_request(rejection.body_text())
            })
    }
}

/// Query string extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct Query<T>(pub T);

impl<T, S> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        axum::extract::Query::<T>::from_request_parts(parts, state)
            .await
            .map(|axum::extract::Query(value)| Query(value))
            .map_err(|rejection: QueryRejection| {
                AppError::with_message(ErrorCode::InvalidFormat, rejection.body_text())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http::{StatusCode, header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        name: String,
    }

    fn json_request(content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = http::Request::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        builder.body(Body::from(body)).unwrap()
    }

    async fn extract(req: Request) -> Result<Json<Payload>, AppError> {
        Json::<Payload>::from_request(req, &()).await
    }

    #[tokio::test]
    async fn test_missing_field_is_validation_error() {
        let err = extract(json_request(Some("application/json"), "{}"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
        assert!(err.message.contains("name"));
    }

    #[tokio::test]
    async fn test_syntax_error_is_invalid_format() {
        let err = extract(json_request(Some("application/json"), "{\"name\":"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_content_type_is_invalid_request() {
        let err = extract(json_request(None, "{\"name\":\"a\"}"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn test_valid_body_extracts() {
        let Json(payload) = extract(json_request(Some("application/json"), "{\"name\":\"a\"}"))
            .await
            .unwrap();
        assert_eq!(payload.name, "a");
    }

    #[tokio::test]
    async fn test_multipart_without_boundary_is_invalid_request() {
        let req = json_request(Some("multipart/form-data"), "");
        let err = Multipart::from_request(req, &()).await.err().unwrap();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
    }
}
