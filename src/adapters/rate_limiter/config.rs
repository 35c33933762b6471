//! Rate limit configuration types.

use serde::{Deserialize, Serialize};

/// Fixed-window limits for the model relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Window duration in seconds.
    #[serde(default = "default_window_secs")]
    pub window_secs: u32,
    /// Requests allowed per client address per window.
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
    /// Requests allowed across all clients per window; unlimited when absent.
    #[serde(default)]
    pub global_max_requests: Option<u32>,
}

fn default_window_secs() -> u32 {
    15 * 60
}

fn default_max_requests() -> u32 {
    60
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
            max_requests: default_max_requests(),
            global_max_requests: None,
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u32) -> Self {
        Self {
            window_secs,
            max_requests,
            global_max_requests: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_sixty_per_fifteen_minutes() {
        let config = RateLimitConfig::default();
        assert_eq!(config.max_requests, 60);
        assert_eq!(config.window_secs, 900);
        assert!(config.global_max_requests.is_none());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: RateLimitConfig = serde_json::from_str(r#"{"max_requests": 5}"#).unwrap();
        assert_eq!(config.max_requests, 5);
        assert_eq!(config.window_secs, 900);
    }
}
