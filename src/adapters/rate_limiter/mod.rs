//! Rate limiter adapters.
//!
//! ## Available Adapters
//!
//! - `InMemoryRateLimiter` - Fixed-window counters for a single relay process
//!
//! ## Usage
//!
//! ```ignore
//! use testcraft_relay::adapters::rate_limiter::{InMemoryRateLimiter, RateLimitConfig};
//!
//! let limiter = InMemoryRateLimiter::new(RateLimitConfig::new(60, 900));
//! ```

mod config;
mod in_memory;

pub use config::RateLimitConfig;
pub use in_memory::{InMemoryRateLimiter, RATE_LIMIT_MESSAGE};
