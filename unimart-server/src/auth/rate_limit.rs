//! Application-layer rate limiting for login and registration routes

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::{AppError, ErrorCode};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

use crate::state::AppState;

/// Fixed-window limit for one route
#[derive(Debug, Clone, Copy)]
pub struct RateRule {
    pub route: &'static str,
    pub max_requests: u32,
    pub window: Duration,
}

/// Login: 5 requests/minute per IP
pub const LOGIN_RULE: RateRule = RateRule {
    route: "login",
    max_requests: 5,
    window: Duration::from_secs(60),
};

/// Registration: 3 requests/minute per IP
pub const REGISTER_RULE: RateRule = RateRule {
    route: "register",
    max_requests: 3,
    window: Duration::from_secs(60),
};

/// Entries idle longer than this are dropped by `cleanup`
const ENTRY_TTL: Duration = Duration::from_secs(300);

struct IpEntry {
    count: u32,
    window_start: Instant,
}

#[derive(Clone, Default)]
pub struct RateLimiter {
    /// route name -> (IP -> entry)
    inner: Arc<Mutex<HashMap<&'static str, HashMap<String, IpEntry>>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the request is allowed, `false` if rate-limited.
    pub async fn check(&self, rule: RateRule, ip: &str) -> bool {
        let mut map = self.inner.lock().await;
        let route_map = map.entry(rule.route).or_default();
        let now = Instant::now();

        let entry = route_map.entry(ip.to_owned()).or_insert_with(|| IpEntry {
            count: 0,
            window_start: now,
        });

        // Reset window if expired
        if now.duration_since(entry.window_start) >= rule.window {
            entry.count = 0;
            entry.window_start = now;
        }

        entry.count += 1;
        entry.count <= rule.max_requests
    }

    /// Remove entries older than 5 minutes
    pub async fn cleanup(&self) {
        let mut map = self.inner.lock().await;
        let now = Instant::now();

        for route_map in map.values_mut() {
            route_map.retain(|_, entry| now.duration_since(entry.window_start) < ENTRY_TTL);
        }

        map.retain(|_, route_map| !route_map.is_empty());
    }
}

/// Extract client IP: peer address, or the first X-Forwarded-For entry when
/// the server sits behind a trusted reverse proxy.
fn extract_ip(request: &Request, trust_proxy: bool) -> String {
    if trust_proxy
        && let Some(forwarded) = request.headers().get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
    {
        // X-Forwarded-For can be comma-separated; first entry is the original client
        if let Some(first) = val.split(',').next() {
            let ip = first.trim();
            if !ip.is_empty() {
                return ip.to_owned();
            }
        }
    }

    // Fallback: peer address from extensions (ConnectInfo)
    request
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

async fn enforce(
    state: &AppState,
    rule: RateRule,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = extract_ip(&request, state.trust_proxy);
    if !state.rate_limiter.check(rule, &ip).await {
        tracing::warn!(route = rule.route, ip = %ip, "Rate limit exceeded");
        return Err(AppError::with_message(
            ErrorCode::TooManyRequests,
            "Too many requests, try again later",
        ));
    }
    Ok(next.run(request).await)
}

pub async fn login_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    enforce(&state, LOGIN_RULE, request, next).await
}

pub async fn register_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    enforce(&state, REGISTER_RULE, request, next).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::ConnectInfo;
    use std::net::SocketAddr;

    fn request_from(peer: &str, forwarded: Option<&str>) -> Request {
        let mut builder = http::Request::builder().uri("/api/users/login");
        if let Some(xff) = forwarded {
            builder = builder.header("x-forwarded-for", xff);
        }
        let mut request = builder.body(Body::empty()).unwrap();
        let addr: SocketAddr = peer.parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(addr));
        request
    }

    #[test]
    fn test_forwarded_header_ignored_without_proxy() {
        let request = request_from("198.51.100.7:4000", Some("203.0.113.1"));
        assert_eq!(extract_ip(&request, false), "198.51.100.7");
    }

    #[test]
    fn test_forwarded_header_used_behind_proxy() {
        let request = request_from("10.0.0.2:4000", Some(" 203.0.113.1 , 10.0.0.9"));
        assert_eq!(extract_ip(&request, true), "203.0.113.1");

        // empty header falls back to the peer
        let request = request_from("10.0.0.2:4000", Some(""));
        assert_eq!(extract_ip(&request, true), "10.0.0.2");
    }

    #[test]
    fn test_unknown_peer() {
        let request = http::Request::builder().body(Body::empty()).unwrap();
        assert_eq!(extract_ip(&request, false), "unknown");
    }

    #[tokio::test]
    async fn test_limit_per_ip_and_route() {
        let limiter = RateLimiter::new();
        for _ in 0..REGISTER_RULE.max_requests {
            assert!(limiter.check(REGISTER_RULE, "10.0.0.1").await);
        }
        assert!(!limiter.check(REGISTER_RULE, "10.0.0.1").await);

        // other IPs and routes have their own budget
        assert!(limiter.check(REGISTER_RULE, "10.0.0.2").await);
        assert!(limiter.check(LOGIN_RULE, "10.0.0.1").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_resets() {
        let limiter = RateLimiter::new();
        for _ in 0..LOGIN_RULE.max_requests {
            assert!(limiter.check(LOGIN_RULE, "10.0.0.1").await);
        }
        assert!(!limiter.check(LOGIN_RULE, "10.0.0.1").await);

        tokio::time::advance(LOGIN_RULE.window).await;
        assert!(limiter.check(LOGIN_RULE, "10.0.0.1").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_drops_stale_entries() {
        let limiter = RateLimiter::new();
        limiter.check(LOGIN_RULE, "10.0.0.1").await;
        tokio::time::advance(ENTRY_TTL).await;
        limiter.cleanup().await;
        assert!(limiter.inner.lock().await.is_empty());
    }
}
