//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Relay side
//!
//! - `AIProvider` - Hosted model invocation
//! - `TextExtractor` - Plain text from uploaded files
//! - `RateLimiter` - Per-address request windows
//!
//! ## Client side
//!
//! - `RelayApi` - Calls to the relay, plus the shared wire types
//! - `NoticeSink` - User-facing notifications
//! - `WorkspaceStorage` - Saving and loading the document store

mod ai_provider;
mod notice_sink;
mod rate_limiter;
mod relay_api;
mod text_extractor;
mod workspace_storage;

pub use ai_provider::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};
pub use notice_sink::{Notice, NoticeLevel, NoticeSink};
pub use rate_limiter::{
    RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitScope,
    RateLimitStatus, RateLimiter,
};
pub use relay_api::{
    AnalyzeTextRequest, ChatReply, ChatRequest, ConflictReply, DocumentAnalysisReply,
    DuplicateReply, DuplicateRequest, ErrorBody, GapAnalysisRequest, GapReply, HealthReply,
    RelayApi, RelayClientError, RequirementsRequest, ScenarioReply, ScenarioRequest,
    StructuredEnvelope, TestCaseReply,
};
pub use text_extractor::{ExtractionError, TextExtractor};
pub use workspace_storage::{WorkspaceStorage, WorkspaceStorageError};
