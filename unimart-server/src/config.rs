//! Server configuration

use std::path::PathBuf;

use crate::error::BoxError;
use crate::payment::razorpay::DEFAULT_API_BASE;

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:8080,http://localhost:3000";

/// Razorpay credentials; absent when either key is unset
#[derive(Clone)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: String,
    pub api_base: String,
}

impl std::fmt::Debug for RazorpayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayConfig")
            .field("key_id", &self.key_id)
            .field("key_secret", &"***")
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection URL
    pub database_url: String,
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// HS256 signing secret for session tokens
    pub jwt_secret: String,
    pub razorpay: Option<RazorpayConfig>,
    /// Directory for uploaded product images, served at /uploads
    pub upload_dir: PathBuf,
    pub cors_origins: Vec<String>,
    /// Behind a reverse proxy that sets X-Forwarded-For
    pub trust_proxy: bool,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let razorpay = match (non_empty_var("RAZORPAY_KEY_ID"), non_empty_var("RAZORPAY_KEY_SECRET")) {
            (Some(key_id), Some(key_secret)) => Some(RazorpayConfig {
                key_id,
                key_secret,
                api_base: non_empty_var("RAZORPAY_API_BASE")
                    .unwrap_or_else(|| DEFAULT_API_BASE.into()),
            }),
            _ => None,
        };

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:unimart.db".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            environment,
            razorpay,
            upload_dir: std::env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "uploads".into())
                .into(),
            cors_origins: parse_origins(
                &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.into()),
            ),
            trust_proxy: non_empty_var("TRUST_PROXY").is_some_and(|v| parse_flag(&v)),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}
