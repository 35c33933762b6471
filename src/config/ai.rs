//! Bedrock model configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use crate::adapters::ai::{AwsCredentials, BedrockAuth, BedrockConfig};
use crate::domain::analysis::DEFAULT_MAX_TOKENS;

use super::error::ValidationError;

/// Hosted model configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// AWS region hosting the model
    #[serde(default = "default_region")]
    pub region: String,

    /// Bedrock model identifier; also selects the payload family
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// AWS access key id (SigV4)
    pub access_key_id: Option<String>,

    /// AWS secret access key (SigV4)
    pub secret_access_key: Option<Secret<String>>,

    /// Temporary-credential session token (SigV4)
    pub session_token: Option<Secret<String>>,

    /// Bedrock API key, sent as a bearer token instead of signing
    pub api_key: Option<Secret<String>>,

    /// Overrides the regional runtime endpoint
    pub endpoint_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Completion budget for structured tasks
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if a Bedrock API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Check if an access key pair is configured
    pub fn has_access_keys(&self) -> bool {
        self.access_key_id.as_ref().is_some_and(|k| !k.is_empty())
            && self
                .secret_access_key
                .as_ref()
                .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Fill credentials and region left unset from the standard AWS variables.
    ///
    /// `lookup` is `std::env::var` in production.
    pub fn fill_from_aws_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.access_key_id.is_none() {
            self.access_key_id = lookup("AWS_ACCESS_KEY_ID");
        }
        if self.secret_access_key.is_none() {
            self.secret_access_key = lookup("AWS_SECRET_ACCESS_KEY").map(Secret::new);
        }
        if self.session_token.is_none() {
            self.session_token = lookup("AWS_SESSION_TOKEN").map(Secret::new);
        }
        if self.api_key.is_none() {
            self.api_key = lookup("AWS_BEARER_TOKEN_BEDROCK").map(Secret::new);
        }
        if let Some(model_id) = lookup("BEDROCK_MODEL_ID") {
            if self.model_id == default_model_id() {
                self.model_id = model_id;
            }
        }
        if let Some(region) = lookup("AWS_REGION") {
            if self.region == default_region() {
                self.region = region;
            }
        }
    }

    /// Provider configuration; the API key wins over an access key pair.
    pub fn bedrock_config(&self) -> Result<BedrockConfig, ValidationError> {
        let auth = if self.has_api_key() {
            self.api_key.clone().map(BedrockAuth::ApiKey)
        } else if self.has_access_keys() {
            match (&self.access_key_id, &self.secret_access_key) {
                (Some(id), Some(secret)) => {
                    let mut credentials =
                        AwsCredentials::new(id.clone(), secret.expose_secret().clone());
                    if let Some(token) = &self.session_token {
                        credentials =
                            credentials.with_session_token(token.expose_secret().clone());
                    }
                    Some(BedrockAuth::SigV4(credentials))
                }
                _ => None,
            }
        } else {
            None
        };
        let auth = auth.ok_or(ValidationError::NoCredentialsConfigured)?;

        let mut config = BedrockConfig::new(self.region.clone(), self.model_id.clone())
            .with_auth(auth)
            .with_timeout(self.timeout())
            .with_default_max_tokens(self.default_max_tokens);
        if let Some(url) = &self.endpoint_url {
            config = config.with_endpoint_url(url.clone());
        }
        Ok(config)
    }

    /// Validate model configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.model_id.trim().is_empty() {
            return Err(ValidationError::MissingRequired("AI__MODEL_ID"));
        }
        if self.region.trim().is_empty() {
            return Err(ValidationError::MissingRequired("AI__REGION"));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 600 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.default_max_tokens == 0 {
            return Err(ValidationError::InvalidMaxTokens);
        }
        if let Some(url) = &self.endpoint_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ValidationError::InvalidEndpointUrl);
            }
        }
        if !self.has_api_key() && !self.has_access_keys() {
            return Err(ValidationError::NoCredentialsConfigured);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            model_id: default_model_id(),
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
            api_key: None,
            endpoint_url: None,
            timeout_secs: default_timeout(),
            default_max_tokens: default_max_tokens(),
        }
    }
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_model_id() -> String {
    "us.anthropic.claude-haiku-4-5-20251001-v1:0".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}
