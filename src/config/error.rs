//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid model request timeout")]
    InvalidTimeout,

    #[error("Invalid completion token budget")]
    InvalidMaxTokens,

    #[error("Invalid body limit: {0}")]
    InvalidBodyLimit(&'static str),

    #[error("Invalid allowed origin")]
    InvalidOrigin,

    #[error("Invalid Bedrock endpoint URL")]
    InvalidEndpointUrl,

    #[error("No Bedrock credentials configured")]
    NoCredentialsConfigured,

    #[error("Invalid rate limit: {0}")]
    InvalidRateLimit(&'static str),
}
