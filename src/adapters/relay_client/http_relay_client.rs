//! HTTP Relay Client - Implementation of RelayApi over reqwest.
//!
//! Mirrors the relay's routes one to one. Non-2xx replies are turned into
//! `RelayClientError::Status` carrying the relay's `error` message.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::domain::analysis::NamedText;
use crate::ports::{
    AnalyzeTextRequest, ChatReply, ChatRequest, ConflictReply, DocumentAnalysisReply,
    DuplicateReply, DuplicateRequest, GapAnalysisRequest, GapReply, HealthReply, RelayApi,
    RelayClientError, RequirementsRequest, ScenarioReply, ScenarioRequest, TestCaseReply,
};

/// Configuration for the relay client.
#[derive(Debug, Clone)]
pub struct RelayClientConfig {
    /// Relay origin, e.g. `http://localhost:3001`.
    pub base_url: String,
    /// Per-request timeout; model calls can be slow.
    pub timeout: Duration,
}

impl RelayClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(180),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Relay client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRelayClient {
    base_url: String,
    client: Client,
}

impl HttpRelayClient {
    pub fn new(config: RelayClientConfig) -> Result<Self, RelayClientError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RelayClientError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn ai_url(&self, endpoint: &str) -> String {
        format!("{}/api/ai/{}", self.base_url, endpoint)
    }

    async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> Result<T, RelayClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.ai_url(endpoint))
            .json(body)
            .send()
            .await
            .map_err(|e| RelayClientError::Network(e.to_string()))?;

        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, RelayClientError> {
        let status = response.status();
        if !status.is_success() {
            let body: Option<Value> = response.json().await.ok();
            let message = match body {
                None => "Request failed".to_string(),
                Some(body) => body
                    .get("error")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
            };
            return Err(RelayClientError::status(status.as_u16(), message));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| RelayClientError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RelayApi for HttpRelayClient {
    async fn health(&self) -> Result<HealthReply, RelayClientError> {
        let response = self
            .client
            .get(format!("{}/api/health", self.base_url))
            .send()
            .await
            .map_err(|e| RelayClientError::Network(e.to_string()))?;

        Self::decode(response).await
    }

    async fn analyze_document(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<DocumentAnalysisReply, RelayClientError> {
        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.to_string()));

        let response = self
            .client
            .post(self.ai_url("analyze-document"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| RelayClientError::Network(e.to_string()))?;

        Self::decode(response).await
    }

    async fn analyze_text(
        &self,
        text: &str,
        file_name: &str,
    ) -> Result<DocumentAnalysisReply, RelayClientError> {
        let body = AnalyzeTextRequest {
            text: Some(text.to_string()),
            file_name: Some(file_name.to_string()),
        };
        self.post_json("analyze-text", &body).await
    }

    async fn generate_scenarios(
        &self,
        requirements: Vec<Value>,
    ) -> Result<ScenarioReply, RelayClientError> {
        self.post_json("generate-scenarios", &RequirementsRequest { requirements })
            .await
    }

    async fn generate_test_cases(&self, scenario: Value) -> Result<TestCaseReply, RelayClientError> {
        let body = ScenarioRequest {
            scenario: Some(scenario),
        };
        self.post_json("generate-testcases", &body).await
    }

    async fn detect_conflicts(
        &self,
        requirements: Vec<Value>,
    ) -> Result<ConflictReply, RelayClientError> {
        self.post_json("detect-conflicts", &RequirementsRequest { requirements })
            .await
    }

    async fn chat(&self, message: &str, context: Option<&str>) -> Result<ChatReply, RelayClientError> {
        let body = ChatRequest {
            message: Some(message.to_string()),
            context: context.map(str::to_string),
        };
        self.post_json("chat", &body).await
    }

    async fn analyze_gaps(&self, request: GapAnalysisRequest) -> Result<GapReply, RelayClientError> {
        self.post_json("analyze-gaps", &request).await
    }

    async fn detect_duplicates(
        &self,
        files: Vec<NamedText>,
    ) -> Result<DuplicateReply, RelayClientError> {
        self.post_json("detect-duplicates", &DuplicateRequest { files })
            .await
    }
}
