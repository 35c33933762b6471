//! The complete relay application router.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::{middleware, Router};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::ports::RateLimiter;

use super::ai::{ai_routes, health_routes, not_found, RelayAppState};
use super::middleware::{rate_limit_middleware, RateLimitState};

/// Build the relay router.
///
/// Model endpoints are nested under `/api/ai` behind the rate limiter; the
/// health check is not limited. Unmatched paths answer 404 `{"error":"Not found"}`.
pub fn relay_router(
    state: RelayAppState,
    limiter: Arc<dyn RateLimiter>,
    server: &ServerConfig,
) -> Router {
    let state = state.with_json_body_limit(server.json_body_limit_bytes);
    let rate_limit = RateLimitState::new(limiter, server.trust_forwarded_headers);

    let ai = ai_routes(state.upload_limit_bytes).layer(middleware::from_fn_with_state(
        rate_limit,
        rate_limit_middleware,
    ));

    let router = health_routes()
        .nest("/api/ai", ai)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(server.json_body_limit_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        );

    let router = match cors_layer(&server.allowed_origin) {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router.with_state(state)
}

/// CORS for the single front-end origin, with credentials.
fn cors_layer(origin: &str) -> Option<CorsLayer> {
    let origin = match HeaderValue::from_str(origin) {
        Ok(origin) => origin,
        Err(_) => {
            tracing::warn!(origin, "allowed origin is not a valid header value; CORS disabled");
            return None;
        }
    };

    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]),
    )
}
