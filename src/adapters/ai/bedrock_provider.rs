//! Bedrock Provider - Implementation of AIProvider for Amazon Bedrock InvokeModel.
//!
//! One POST per completion to `{endpoint}/model/{model-id}/invoke`. The
//! payload shape follows the model family. Requests authenticate with either
//! a Bedrock API key or AWS Signature Version 4.
//!
//! # Configuration
//!
//! ```ignore
//! let config = BedrockConfig::new("us-east-1", "us.anthropic.claude-haiku-4-5-20251001-v1:0")
//!     .with_auth(BedrockAuth::api_key(key))
//!     .with_timeout(Duration::from_secs(120));
//!
//! let provider = BedrockProvider::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;
use std::time::Duration;

use super::model_family::ModelFamily;
use super::sigv4::{self, AwsCredentials, SigningInput};
use crate::domain::analysis::DEFAULT_MAX_TOKENS;
use crate::domain::foundation::Timestamp;
use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};

/// How requests prove who they are.
#[derive(Debug, Clone)]
pub enum BedrockAuth {
    /// Bedrock API key sent as a bearer token.
    ApiKey(Secret<String>),
    /// Access key pair, signed with SigV4.
    SigV4(AwsCredentials),
}

impl BedrockAuth {
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey(Secret::new(key.into()))
    }
}

/// Configuration for the Bedrock provider.
#[derive(Debug, Clone)]
pub struct BedrockConfig {
    pub region: String,
    pub model_id: String,
    pub auth: Option<BedrockAuth>,
    /// Overrides `https://bedrock-runtime.{region}.amazonaws.com`.
    pub endpoint_url: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
    /// Completion budget for requests that do not set their own.
    pub default_max_tokens: u32,
}

impl BedrockConfig {
    pub fn new(region: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            model_id: model_id.into(),
            auth: None,
            endpoint_url: None,
            timeout: Duration::from_secs(120),
            default_max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_auth(mut self, auth: BedrockAuth) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn with_endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_default_max_tokens(mut self, max_tokens: u32) -> Self {
        self.default_max_tokens = max_tokens;
        self
    }

    fn endpoint(&self) -> String {
        match &self.endpoint_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://bedrock-runtime.{}.amazonaws.com", self.region),
        }
    }
}

/// Amazon Bedrock provider implementation.
pub struct BedrockProvider {
    config: BedrockConfig,
    family: ModelFamily,
    invoke_url: Url,
    client: Client,
}

impl BedrockProvider {
    /// Creates a provider, fixing the model family from the configured id.
    pub fn new(config: BedrockConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))?;

        let invoke_url = format!(
            "{}/model/{}/invoke",
            config.endpoint(),
            sigv4::uri_encode(&config.model_id)
        );
        let invoke_url = Url::parse(&invoke_url)
            .map_err(|e| AIError::InvalidRequest(format!("Invalid Bedrock endpoint: {}", e)))?;

        let family = ModelFamily::from_model_id(&config.model_id);
        tracing::debug!(model = %config.model_id, family = family.as_str(), "configured Bedrock provider");

        Ok(Self {
            config,
            family,
            invoke_url,
            client,
        })
    }

    pub fn family(&self) -> ModelFamily {
        self.family
    }

    pub fn invoke_url(&self) -> &Url {
        &self.invoke_url
    }

    async fn send_request(&self, body: Vec<u8>) -> Result<Response, AIError> {
        let mut builder = self
            .client
            .post(self.invoke_url.clone())
            .header("content-type", "application/json")
            .header("accept", "application/json");

        match &self.config.auth {
            Some(BedrockAuth::ApiKey(key)) => {
                builder = builder.bearer_auth(key.expose_secret());
            }
            Some(BedrockAuth::SigV4(credentials)) => {
                let host = match self.invoke_url.port() {
                    Some(port) => format!("{}:{}", self.invoke_url.host_str().unwrap_or_default(), port),
                    None => self.invoke_url.host_str().unwrap_or_default().to_string(),
                };
                let signed = sigv4::sign(
                    credentials,
                    SigningInput {
                        host: &host,
                        path: self.invoke_url.path(),
                        region: &self.config.region,
                        body: &body,
                        at: Timestamp::now(),
                    },
                );
                builder = builder
                    .header("authorization", signed.authorization)
                    .header("x-amz-date", signed.amz_date);
                if let Some(token) = signed.security_token {
                    builder = builder.header("x-amz-security-token", token);
                }
            }
            None => {}
        }

        builder.body(body).send().await.map_err(|e| {
            if e.is_timeout() {
                AIError::Timeout {
                    timeout_secs: self.config.timeout.as_secs() as u32,
                }
            } else if e.is_connect() {
                AIError::network(format!("Connection failed: {}", e))
            } else {
                AIError::network(e.to_string())
            }
        })
    }

    /// Parses the API response status and handles errors.
    async fn handle_response_status(&self, response: Response) -> Result<Response, AIError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        let message = Self::error_message(&error_body);

        match status.as_u16() {
            401 | 403 => Err(AIError::AuthenticationFailed),
            429 => Err(AIError::rate_limited(60)),
            400 => Err(AIError::InvalidRequest(message)),
            500..=599 => Err(AIError::unavailable(format!(
                "Server error {}: {}",
                status, message
            ))),
            code => Err(AIError::provider(code, message)),
        }
    }

    /// Bedrock error bodies are `{"message": "..."}`; anything else is passed through.
    fn error_message(body: &str) -> String {
        serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .or_else(|| v.get("Message"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| body.to_string())
    }
}

#[async_trait]
impl AIProvider for BedrockProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let max_tokens = request
            .max_tokens
            .unwrap_or(self.config.default_max_tokens);
        let payload = self.family.build_payload(&request, max_tokens);
        let body = serde_json::to_vec(&payload)
            .map_err(|e| AIError::InvalidRequest(format!("Failed to encode payload: {}", e)))?;

        tracing::debug!(
            model = %self.config.model_id,
            max_tokens,
            body_bytes = body.len(),
            "invoking Bedrock model"
        );

        let response = self.send_request(body).await?;
        let response = self.handle_response_status(response).await?;

        let reply: Value = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;
        let content = self.family.extract_text(&reply)?;

        Ok(CompletionResponse::new(content, &self.config.model_id))
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("bedrock", &self.config.model_id)
    }
}
