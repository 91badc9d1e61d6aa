//! Application state

use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;

use crate::auth::rate_limit::RateLimiter;
use crate::config::Config;
use crate::db::DbService;
use crate::error::BoxError;
use crate::payment::{PaymentGateway, RazorpayGateway};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// JWT secret for session tokens
    pub jwt_secret: Arc<str>,
    /// `None` when the gateway keys are not configured
    pub gateway: Option<Arc<dyn PaymentGateway>>,
    /// Where uploaded images are written
    pub upload_dir: PathBuf,
    pub cors_origins: Vec<String>,
    /// Take client IPs from X-Forwarded-For
    pub trust_proxy: bool,
    /// Rate limiter for login/registration routes
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Create a new AppState
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let db = DbService::new(&config.database_url).await?;

        let gateway: Option<Arc<dyn PaymentGateway>> = match &config.razorpay {
            Some(rzp) => {
                match RazorpayGateway::new(&rzp.key_id, &rzp.key_secret, &rzp.api_base) {
                    Ok(gateway) => {
                        tracing::info!(api_base = %rzp.api_base, "Payment gateway ready");
                        Some(Arc::new(gateway))
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Payment gateway init failed, payments disabled");
                        None
                    }
                }
            }
            None => {
                tracing::warn!(
                    "RAZORPAY_KEY_ID / RAZORPAY_KEY_SECRET not set, payments disabled"
                );
                None
            }
        };

        tokio::fs::create_dir_all(&config.upload_dir).await?;

        let mut state = Self::from_parts(
            db.pool,
            &config.jwt_secret,
            gateway,
            config.upload_dir.clone(),
        );
        state.cors_origins = config.cors_origins.clone();
        state.trust_proxy = config.trust_proxy;
        Ok(state)
    }

    /// Assemble state from ready-made parts (tests, embedding)
    pub fn from_parts(
        pool: SqlitePool,
        jwt_secret: &str,
        gateway: Option<Arc<dyn PaymentGateway>>,
        upload_dir: PathBuf,
    ) -> Self {
        Self {
            pool,
            jwt_secret: Arc::from(jwt_secret),
            gateway,
            upload_dir,
            cors_origins: Vec::new(),
            trust_proxy: false,
            rate_limiter: RateLimiter::new(),
        }
    }
}
