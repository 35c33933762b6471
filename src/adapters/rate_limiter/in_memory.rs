//! In-memory rate limiter.
//!
//! Uses a fixed-window counter algorithm with an in-memory HashMap. Counters
//! live in one process, which matches a single relay instance.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::Timestamp;
use crate::ports::{
    RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitScope,
    RateLimitStatus, RateLimiter,
};

use super::config::RateLimitConfig;

/// Message returned to clients that exceed the window.
pub const RATE_LIMIT_MESSAGE: &str = "Too many AI requests, try again later";

/// Windows kept before expired entries are swept.
const SWEEP_THRESHOLD: usize = 10_000;

/// Fixed-window rate limiter. Each window counts requests and resets when it
/// expires.
#[derive(Debug, Clone)]
pub struct InMemoryRateLimiter {
    config: RateLimitConfig,
    /// Per-key window state.
    windows: Arc<RwLock<HashMap<String, WindowState>>>,
}

/// State for a single rate limit window.
#[derive(Debug, Clone)]
struct WindowState {
    /// Number of requests in the current window.
    count: u32,
    /// When the current window started.
    window_start: u64,
    /// Window duration in seconds.
    window_secs: u32,
}

impl WindowState {
    fn end(&self) -> u64 {
        self.window_start + self.window_secs as u64
    }
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a rate limiter with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(RateLimitConfig::default())
    }

    /// Get the limit and window for a key.
    fn limits_for(&self, key: &RateLimitKey) -> (u32, u32) {
        match key.scope {
            RateLimitScope::Global => (
                self.config.global_max_requests.unwrap_or(u32::MAX),
                self.config.window_secs,
            ),
            RateLimitScope::Ip => (self.config.max_requests, self.config.window_secs),
        }
    }

    /// Get current timestamp as unix seconds.
    fn now_secs() -> u64 {
        Timestamp::now().as_unix_secs()
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitResult, RateLimitError> {
        let storage_key = key.storage_key();
        let (limit, window_secs) = self.limits_for(&key);
        let now = Self::now_secs();

        let mut windows = self.windows.write().await;

        if windows.len() >= SWEEP_THRESHOLD {
            windows.retain(|_, state| now < state.end());
        }

        let state = windows.entry(storage_key).or_insert_with(|| WindowState {
            count: 0,
            window_start: now,
            window_secs,
        });

        if now >= state.end() {
            state.count = 0;
            state.window_start = now;
            state.window_secs = window_secs;
        }

        if state.count >= limit {
            let retry_after = state.end().saturating_sub(now) as u32;

            tracing::debug!(scope = %key.scope, identifier = %key.identifier, "rate limit exceeded");

            return Ok(RateLimitResult::Denied(RateLimitDenied {
                limit,
                retry_after_secs: retry_after.max(1),
                reset_at: Timestamp::from_unix_secs(state.end()),
                scope: key.scope,
                message: RATE_LIMIT_MESSAGE.to_string(),
            }));
        }

        state.count += 1;
        let remaining = limit.saturating_sub(state.count);
        let reset_at = Timestamp::from_unix_secs(state.end());

        Ok(RateLimitResult::Allowed(RateLimitStatus {
            limit,
            remaining,
            reset_at,
            window_secs,
        }))
    }
}
