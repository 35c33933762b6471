//! Rate limiting port for protecting the model relay.
//!
//! Fixed-window counters keyed by client address. The only state the relay
//! shares between requests lives behind this port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::Timestamp;

/// Port for rate limiting operations.
///
/// Implementations must be safe to call concurrently.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Counts one request against `key` and reports whether it is allowed.
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitResult, RateLimitError>;
}

/// Key identifying what to rate limit.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct RateLimitKey {
    pub scope: RateLimitScope,
    /// Identifier within the scope (e.g. an IP address).
    pub identifier: String,
}

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateLimitScope {
    Global,
    Ip,
}

impl RateLimitKey {
    /// Creates a global rate limit key.
    pub fn global() -> Self {
        Self {
            scope: RateLimitScope::Global,
            identifier: "global".to_string(),
        }
    }

    /// Creates an IP-based rate limit key.
    pub fn ip(ip: &str) -> Self {
        Self {
            scope: RateLimitScope::Ip,
            identifier: ip.to_string(),
        }
    }

    /// Flat string form used as the window map key.
    pub fn storage_key(&self) -> String {
        format!("ratelimit:{}:{}", self.scope.as_str(), self.identifier)
    }
}

impl RateLimitScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateLimitScope::Global => "global",
            RateLimitScope::Ip => "ip",
        }
    }
}

impl fmt::Display for RateLimitScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of a rate limit check.
#[derive(Debug, Clone)]
pub enum RateLimitResult {
    Allowed(RateLimitStatus),
    Denied(RateLimitDenied),
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed(_))
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, RateLimitResult::Denied(_))
    }
}

/// Current rate limit status.
#[derive(Debug, Clone)]
pub struct RateLimitStatus {
    /// Maximum requests allowed in the window.
    pub limit: u32,
    /// Remaining requests in the current window.
    pub remaining: u32,
    /// When the current window resets.
    pub reset_at: Timestamp,
    pub window_secs: u32,
}

/// Details of a rate limit denial.
#[derive(Debug, Clone)]
pub struct RateLimitDenied {
    pub limit: u32,
    /// Seconds until the client should retry.
    pub retry_after_secs: u32,
    pub reset_at: Timestamp,
    pub scope: RateLimitScope,
    /// Message sent back to the client.
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("rate limiter unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_key_has_correct_scope() {
        let key = RateLimitKey::global();
        assert_eq!(key.scope, RateLimitScope::Global);
        assert_eq!(key.identifier, "global");
    }

    #[test]
    fn ip_key_storage_format() {
        assert_eq!(
            RateLimitKey::ip("192.168.1.1").storage_key(),
            "ratelimit:ip:192.168.1.1"
        );
        assert_eq!(RateLimitKey::global().storage_key(), "ratelimit:global:global");
    }

    #[test]
    fn global_and_ip_keys_never_collide() {
        assert_ne!(
            RateLimitKey::ip("global").storage_key(),
            RateLimitKey::global().storage_key()
        );
    }

    #[test]
    fn scope_displays_as_str() {
        assert_eq!(RateLimitScope::Ip.to_string(), "ip");
        assert_eq!(RateLimitScope::Global.to_string(), "global");
    }
}
