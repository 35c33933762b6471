//! Rate limiting middleware for axum.
//!
//! Enforces the `RateLimiter` port on every model endpoint. The client
//! address comes from `ConnectInfo`; forwarded headers are honoured only when
//! the relay sits behind a trusted proxy.
//!
//! Rate limit status is returned in standard HTTP headers:
//! - `X-RateLimit-Limit`: Maximum requests allowed in the window
//! - `X-RateLimit-Remaining`: Requests remaining in the current window
//! - `X-RateLimit-Reset`: Unix timestamp when the window resets
//! - `Retry-After`: Seconds to wait (only on 429 response)
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, routing::post, middleware};
//! use std::sync::Arc;
//!
//! let state = RateLimitState::new(Arc::new(InMemoryRateLimiter::with_defaults()), false);
//!
//! let app = Router::new()
//!     .route("/api/ai/chat", post(handler))
//!     .layer(middleware::from_fn_with_state(state, rate_limit_middleware));
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::ports::{ErrorBody, RateLimitKey, RateLimitResult, RateLimiter};

/// Key used when the client address cannot be determined.
const UNKNOWN_CLIENT: &str = "unknown";

/// Rate limiter middleware state.
#[derive(Clone)]
pub struct RateLimitState {
    limiter: Arc<dyn RateLimiter>,
    trust_forwarded_headers: bool,
}

impl RateLimitState {
    pub fn new(limiter: Arc<dyn RateLimiter>, trust_forwarded_headers: bool) -> Self {
        Self {
            limiter,
            trust_forwarded_headers,
        }
    }
}

/// Standard rate limit header names.
pub mod headers {
    use super::HeaderName;

    /// Maximum requests allowed in the window.
    pub static X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
    /// Requests remaining in the current window.
    pub static X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
    /// Unix timestamp when the window resets.
    pub static X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");
}

/// Rate limiting middleware that checks the global and per-address windows.
///
/// This middleware:
/// 1. Resolves the client address
/// 2. Checks the global window (unlimited unless configured)
/// 3. Checks the per-address window
/// 4. Returns 429 Too Many Requests if either is exhausted
/// 5. Adds rate limit headers to allowed responses
///
/// A limiter failure lets the request through.
pub async fn rate_limit_middleware(
    State(state): State<RateLimitState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    let client_ip = extract_client_ip(
        request.headers(),
        connect_info.as_ref(),
        state.trust_forwarded_headers,
    )
    .unwrap_or_else(|| UNKNOWN_CLIENT.to_string());

    match state.limiter.check(RateLimitKey::global()).await {
        Ok(RateLimitResult::Denied(denied)) => {
            return rate_limit_response(
                denied.limit,
                denied.retry_after_secs,
                denied.reset_at.as_unix_secs(),
                &denied.message,
            );
        }
        Err(e) => {
            tracing::warn!("Rate limiter unavailable: {}", e);
        }
        Ok(RateLimitResult::Allowed(_)) => {}
    }

    let status = match state.limiter.check(RateLimitKey::ip(&client_ip)).await {
        Ok(RateLimitResult::Denied(denied)) => {
            tracing::info!(client_ip = %client_ip, path = %request.uri().path(), "rate limited");
            return rate_limit_response(
                denied.limit,
                denied.retry_after_secs,
                denied.reset_at.as_unix_secs(),
                &denied.message,
            );
        }
        Ok(RateLimitResult::Allowed(status)) => Some(status),
        Err(e) => {
            tracing::warn!("Rate limiter unavailable for IP check: {}", e);
            None
        }
    };

    let mut response = next.run(request).await;

    if let Some(status) = status {
        add_rate_limit_headers(
            response.headers_mut(),
            status.limit,
            status.remaining,
            status.reset_at.as_unix_secs(),
        );
    }

    response
}

/// Extract the client address.
///
/// With `trust_forwarded` set, `X-Forwarded-For` (first entry) and then
/// `X-Real-IP` take precedence over the socket address.
fn extract_client_ip(
    headers: &HeaderMap,
    connect_info: Option<&ConnectInfo<SocketAddr>>,
    trust_forwarded: bool,
) -> Option<String> {
    if trust_forwarded {
        let forwarded = headers
            .get("X-Forwarded-For")
            .and_then(|h| h.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty());
        if let Some(ip) = forwarded {
            return Some(ip.to_string());
        }

        if let Some(real_ip) = headers.get("X-Real-IP").and_then(|h| h.to_str().ok()) {
            return Some(real_ip.trim().to_string());
        }
    }

    connect_info.map(|ci| ci.0.ip().to_string())
}

/// Create a 429 Too Many Requests response.
fn rate_limit_response(limit: u32, retry_after_secs: u32, reset_at: u64, message: &str) -> Response {
    let body = ErrorBody {
        error: message.to_string(),
    };
    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();

    let headers = response.headers_mut();
    add_rate_limit_headers(headers, limit, 0, reset_at);
    headers.insert(
        axum::http::header::RETRY_AFTER,
        HeaderValue::from(retry_after_secs),
    );

    response
}

/// Add rate limit headers to a response.
fn add_rate_limit_headers(headers: &mut HeaderMap, limit: u32, remaining: u32, reset_at: u64) {
    headers.insert(headers::X_RATELIMIT_LIMIT.clone(), HeaderValue::from(limit));
    headers.insert(
        headers::X_RATELIMIT_REMAINING.clone(),
        HeaderValue::from(remaining),
    );
    headers.insert(headers::X_RATELIMIT_RESET.clone(), HeaderValue::from(reset_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::rate_limiter::{InMemoryRateLimiter, RateLimitConfig, RATE_LIMIT_MESSAGE};
    use crate::ports::RateLimitError;
    use axum::{body::Body, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn forwarded_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("X-Forwarded-For", HeaderValue::from_static("1.2.3.4, 5.6.7.8"));
        headers.insert("X-Real-IP", HeaderValue::from_static("9.8.7.6"));
        headers
    }

    fn socket() -> ConnectInfo<SocketAddr> {
        ConnectInfo(SocketAddr::from(([10, 0, 0, 9], 52000)))
    }

    fn limited_app(max_requests: u32) -> Router {
        let limiter: Arc<dyn RateLimiter> =
            Arc::new(InMemoryRateLimiter::new(RateLimitConfig::new(max_requests, 900)));
        Router::new()
            .route("/limited", get(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(
                RateLimitState::new(limiter, false),
                rate_limit_middleware,
            ))
    }

    fn request_from(ip: [u8; 4]) -> axum::http::Request<Body> {
        let mut request = axum::http::Request::builder()
            .uri("/limited")
            .body(Body::empty())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from((ip, 40000))));
        request
    }

    // ════════════════════════════════════════════════════════════════════════════
    // IP Extraction Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn forwarded_headers_ignored_by_default() {
        let ip = extract_client_ip(&forwarded_headers(), Some(&socket()), false);
        assert_eq!(ip, Some("10.0.0.9".to_string()));
    }

    #[test]
    fn trusted_proxy_uses_first_forwarded_ip() {
        let ip = extract_client_ip(&forwarded_headers(), Some(&socket()), true);
        assert_eq!(ip, Some("1.2.3.4".to_string()));
    }

    #[test]
    fn trusted_proxy_falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Real-IP", HeaderValue::from_static("9.8.7.6"));

        let ip = extract_client_ip(&headers, None, true);
        assert_eq!(ip, Some("9.8.7.6".to_string()));
    }

    #[test]
    fn no_address_without_connect_info() {
        let ip = extract_client_ip(&HeaderMap::new(), None, false);
        assert_eq!(ip, None);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Middleware Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn allowed_response_carries_headers() {
        let response = limited_app(3)
            .oneshot(request_from([127, 0, 0, 1]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-ratelimit-limit"], "3");
        assert_eq!(response.headers()["x-ratelimit-remaining"], "2");
        assert!(response.headers().contains_key("x-ratelimit-reset"));
    }

    #[tokio::test]
    async fn exhausted_window_returns_429() {
        let app = limited_app(2);
        for _ in 0..2 {
            let response = app.clone().oneshot(request_from([127, 0, 0, 1])).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app.oneshot(request_from([127, 0, 0, 1])).await.unwrap();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().contains_key("retry-after"));
        assert_eq!(response.headers()["x-ratelimit-remaining"], "0");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, RATE_LIMIT_MESSAGE);
    }

    #[tokio::test]
    async fn addresses_are_limited_independently() {
        let app = limited_app(1);
        let first = app.clone().oneshot(request_from([10, 0, 0, 1])).await.unwrap();
        let second = app.clone().oneshot(request_from([10, 0, 0, 2])).await.unwrap();
        let repeat = app.oneshot(request_from([10, 0, 0, 1])).await.unwrap();

        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(second.status(), StatusCode::OK);
        assert_eq!(repeat.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    struct UnavailableLimiter;

    #[async_trait::async_trait]
    impl RateLimiter for UnavailableLimiter {
        async fn check(&self, _key: RateLimitKey) -> Result<RateLimitResult, RateLimitError> {
            Err(RateLimitError::Unavailable("store offline".to_string()))
        }
    }

    #[tokio::test]
    async fn unavailable_limiter_lets_requests_through() {
        let app = Router::new()
            .route("/limited", get(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(
                RateLimitState::new(Arc::new(UnavailableLimiter), false),
                rate_limit_middleware,
            ));

        let response = app.oneshot(request_from([127, 0, 0, 1])).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(!response.headers().contains_key("x-ratelimit-limit"));
    }

    #[test]
    fn rate_limit_response_has_retry_after_header() {
        let response = rate_limit_response(60, 30, 1_700_000_900, RATE_LIMIT_MESSAGE);
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()["retry-after"], "30");
        assert_eq!(response.headers()["x-ratelimit-reset"], "1700000900");
    }

    #[test]
    fn rate_limit_state_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RateLimitState>();
    }
}
