//! HTTP API
//!
//! Every resource lives under `/api`; uploaded images are served from
//! `/uploads`. Authentication is a single global middleware that lets the
//! public routes through.

pub mod extract;
pub mod health;
pub mod payment;
pub mod products;
pub mod users;
pub mod wishlist;

use axum::{Router, middleware, routing::get};
use http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::state::AppState;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Build the full application router
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(users::router(state.clone()))
        .merge(products::router())
        .merge(wishlist::router())
        .merge(payment::router());

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api)
        .nest_service("/uploads", ServeDir::new(&state.upload_dir))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.cors_origins))
        .with_state(state)
}
