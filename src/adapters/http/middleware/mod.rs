//! HTTP middleware for axum.
//!
//! - `rate_limit` - Per-address request windows on the model endpoints

pub mod rate_limit;

pub use rate_limit::{rate_limit_middleware, RateLimitState};
