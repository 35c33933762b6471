//! Relay API Port - The wire contract between client and relay.
//!
//! Request and reply bodies defined here are serialized by the relay's HTTP
//! handlers and deserialized by the client adapter, so both sides agree on
//! field names by construction.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::analysis::{
    ConflictReport, DocumentAnalysis, DuplicateReport, GapAnalysis, NamedText,
    RequirementDocument, ScenarioSet, StructuredReply, TestCaseSet,
};
use crate::domain::foundation::{lenient_list, lenient_opt_string, or_default};

// ════════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `analyze-text`, and the JSON form of `analyze-document`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzeTextRequest {
    #[serde(deserialize_with = "lenient_opt_string")]
    pub text: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub file_name: Option<String>,
}

/// Body of `generate-scenarios` and `detect-conflicts`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequirementsRequest {
    #[serde(deserialize_with = "or_default")]
    pub requirements: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioRequest {
    pub scenario: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatRequest {
    #[serde(deserialize_with = "lenient_opt_string")]
    pub message: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_opt_string"
    )]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GapAnalysisRequest {
    #[serde(deserialize_with = "lenient_list")]
    pub test_files: Vec<NamedText>,
    #[serde(deserialize_with = "lenient_list")]
    pub documents: Vec<RequirementDocument>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuplicateRequest {
    #[serde(deserialize_with = "lenient_list")]
    pub files: Vec<NamedText>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Replies
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReply {
    pub status: String,
    pub ai: bool,
    pub model: String,
}

/// Reply of `analyze-document` and `analyze-text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAnalysisReply {
    pub analysis: DocumentAnalysis,
    /// Characters of the submitted text; only `analyze-document` sends it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_length: Option<usize>,
    #[serde(default = "structured_default")]
    pub structured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
}

impl DocumentAnalysisReply {
    pub fn new(reply: StructuredReply<DocumentAnalysis>, text_length: Option<usize>) -> Self {
        Self {
            structured: reply.is_structured(),
            analysis: reply.value,
            text_length,
            raw_text: reply.raw_text,
        }
    }
}

/// A schema's fields plus the `structured` flag, at the top level of the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredEnvelope<T> {
    #[serde(flatten)]
    pub body: T,
    #[serde(default = "structured_default")]
    pub structured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
}

impl<T> From<StructuredReply<T>> for StructuredEnvelope<T> {
    fn from(reply: StructuredReply<T>) -> Self {
        Self {
            structured: reply.is_structured(),
            body: reply.value,
            raw_text: reply.raw_text,
        }
    }
}

fn structured_default() -> bool {
    true
}

pub type ScenarioReply = StructuredEnvelope<ScenarioSet>;
pub type TestCaseReply = StructuredEnvelope<TestCaseSet>;
pub type ConflictReply = StructuredEnvelope<ConflictReport>;
pub type GapReply = StructuredEnvelope<GapAnalysis>;
pub type DuplicateReply = StructuredEnvelope<DuplicateReport>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

/// Error body the relay sends with every non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Client port
// ════════════════════════════════════════════════════════════════════════════════

/// Errors seen by relay clients.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelayClientError {
    /// The relay could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The relay answered with an error status; `message` is its `error` field.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("invalid relay response: {0}")]
    Decode(String),
}

impl RelayClientError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }
}

/// Port the client orchestrator uses to reach the relay.
#[async_trait]
pub trait RelayApi: Send + Sync {
    async fn health(&self) -> Result<HealthReply, RelayClientError>;

    /// Uploads a file as multipart form data.
    async fn analyze_document(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<DocumentAnalysisReply, RelayClientError>;

    async fn analyze_text(
        &self,
        text: &str,
        file_name: &str,
    ) -> Result<DocumentAnalysisReply, RelayClientError>;

    async fn generate_scenarios(
        &self,
        requirements: Vec<Value>,
    ) -> Result<ScenarioReply, RelayClientError>;

    async fn generate_test_cases(&self, scenario: Value) -> Result<TestCaseReply, RelayClientError>;

    async fn detect_conflicts(
        &self,
        requirements: Vec<Value>,
    ) -> Result<ConflictReply, RelayClientError>;

    async fn chat(&self, message: &str, context: Option<&str>) -> Result<ChatReply, RelayClientError>;

    async fn analyze_gaps(&self, request: GapAnalysisRequest) -> Result<GapReply, RelayClientError>;

    async fn detect_duplicates(
        &self,
        files: Vec<NamedText>,
    ) -> Result<DuplicateReply, RelayClientError>;
}
