//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `TESTCRAFT` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use testcraft_relay::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Relay listening on {:?}", config.server.socket_addr());
//! ```

mod ai;
mod error;
mod server;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

use crate::adapters::rate_limiter::RateLimitConfig;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (bind address, CORS, body limits)
    #[serde(default)]
    pub server: ServerConfig,

    /// Hosted model configuration (Bedrock)
    #[serde(default)]
    pub ai: AiConfig,

    /// Per-address limits on the model endpoints
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `TESTCRAFT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    /// 5. Fills unset credentials from the standard `AWS_*` variables
    ///
    /// # Environment Variable Format
    ///
    /// - `TESTCRAFT__SERVER__PORT=3001` -> `server.port = 3001`
    /// - `TESTCRAFT__AI__MODEL_ID=...` -> `ai.model_id = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let mut config: AppConfig = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("TESTCRAFT")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.ai.fill_from_aws_env(|name| std::env::var(name).ok());

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        if self.rate_limit.max_requests == 0 {
            return Err(ValidationError::InvalidRateLimit("max_requests"));
        }
        if self.rate_limit.window_secs == 0 {
            return Err(ValidationError::InvalidRateLimit("window_secs"));
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Helper to set environment variables for testing
    /// Uses double underscores to separate nested config values
    fn set_minimal_env() {
        env::set_var("TESTCRAFT__AI__ACCESS_KEY_ID", "AKIDEXAMPLE");
        env::set_var("TESTCRAFT__AI__SECRET_ACCESS_KEY", "wJalrXUtnFEMI");
    }

    /// Helper to clear environment variables after testing
    fn clear_env() {
        env::remove_var("TESTCRAFT__AI__ACCESS_KEY_ID");
        env::remove_var("TESTCRAFT__AI__SECRET_ACCESS_KEY");
        env::remove_var("TESTCRAFT__AI__MODEL_ID");
        env::remove_var("TESTCRAFT__SERVER__PORT");
        env::remove_var("TESTCRAFT__SERVER__ENVIRONMENT");
        env::remove_var("TESTCRAFT__RATE_LIMIT__MAX_REQUESTS");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.ai.access_key_id.as_deref(), Some("AKIDEXAMPLE"));
        assert!(config.ai.has_access_keys());
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.rate_limit.max_requests, 60);
        assert_eq!(config.rate_limit.window_secs, 900);
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("TESTCRAFT__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_custom_values() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("TESTCRAFT__SERVER__PORT", "3000");
        env::set_var("TESTCRAFT__AI__MODEL_ID", "meta.llama3-70b-instruct-v1:0");
        env::set_var("TESTCRAFT__RATE_LIMIT__MAX_REQUESTS", "10");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.ai.model_id, "meta.llama3-70b-instruct-v1:0");
        assert_eq!(config.rate_limit.max_requests, 10);
    }

    #[test]
    fn test_validate_rejects_zero_rate_limit() {
        let mut config = AppConfig::default();
        config.ai.api_key = Some(secrecy::Secret::new("bedrock-key".to_string()));
        assert!(config.validate().is_ok());

        config.rate_limit.max_requests = 0;
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidRateLimit("max_requests"))
        );
    }
}
