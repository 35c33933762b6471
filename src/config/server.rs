//! Server configuration

use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};

use super::error::ValidationError;

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Environment name
    #[serde(default = "default_environment")]
    pub environment: Environment,

    /// Rust log filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// The single front-end origin allowed by CORS
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,

    /// Largest accepted JSON body
    #[serde(default = "default_json_body_limit")]
    pub json_body_limit_bytes: usize,

    /// Largest accepted uploaded file
    #[serde(default = "default_upload_limit")]
    pub upload_limit_bytes: usize,

    /// Take the client address from `X-Forwarded-For` / `X-Real-IP`
    #[serde(default)]
    pub trust_forwarded_headers: bool,
}

/// Application environment
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl ServerConfig {
    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| ValidationError::MissingRequired("a valid SERVER__HOST address"))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Validate server configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        self.socket_addr()?;
        if self.json_body_limit_bytes == 0 {
            return Err(ValidationError::InvalidBodyLimit("json_body_limit_bytes"));
        }
        if self.upload_limit_bytes == 0 {
            return Err(ValidationError::InvalidBodyLimit("upload_limit_bytes"));
        }
        let origin = self.allowed_origin.as_str();
        if !origin.starts_with("http://") && !origin.starts_with("https://") {
            return Err(ValidationError::InvalidOrigin);
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            log_level: default_log_level(),
            allowed_origin: default_allowed_origin(),
            json_body_limit_bytes: default_json_body_limit(),
            upload_limit_bytes: default_upload_limit(),
            trust_forwarded_headers: false,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_environment() -> Environment {
    Environment::Development
}

fn default_log_level() -> String {
    "info,testcraft_relay=debug,tower_http=info".to_string()
}

fn default_allowed_origin() -> String {
    "http://localhost:5173".to_string()
}

fn default_json_body_limit() -> usize {
    5 * 1024 * 1024
}

fn default_upload_limit() -> usize {
    10 * 1024 * 1024
}
