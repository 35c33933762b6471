//! HTTP handlers for the relay endpoints.
//!
//! These handlers connect Axum routes to the application layer command handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::application::handlers::ai::{
    AnalysisError, AnalyzeDocumentHandler, AnalyzeGapsCommand, AnalyzeGapsHandler,
    AnalyzeTextCommand, AnalyzeTextHandler, ChatCommand, ChatHandler, DetectConflictsCommand,
    DetectConflictsHandler, DetectDuplicatesCommand, DetectDuplicatesHandler,
    GenerateScenariosCommand, GenerateScenariosHandler, GenerateTestCasesCommand,
    GenerateTestCasesHandler,
};
use crate::ports::{
    AIProvider, AnalyzeTextRequest, ChatReply, ChatRequest, ConflictReply, DocumentAnalysisReply,
    DuplicateReply, DuplicateRequest, GapAnalysisRequest, GapReply, HealthReply,
    RequirementsRequest, ScenarioReply, ScenarioRequest, TestCaseReply, TextExtractor,
};

use super::super::error::RelayError;
use super::extract::{DocumentUpload, RelayJson};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

const DEFAULT_JSON_BODY_LIMIT_BYTES: usize = 5 * 1024 * 1024;

/// Shared relay state.
///
/// Cloned for each request; handlers are built on demand from it.
#[derive(Clone)]
pub struct RelayAppState {
    pub ai_provider: Arc<dyn AIProvider>,
    pub text_extractor: Arc<dyn TextExtractor>,
    /// Largest accepted uploaded file.
    pub upload_limit_bytes: usize,
    /// Largest accepted JSON body on the upload route.
    pub json_body_limit_bytes: usize,
}

impl RelayAppState {
    pub fn new(
        ai_provider: Arc<dyn AIProvider>,
        text_extractor: Arc<dyn TextExtractor>,
        upload_limit_bytes: usize,
    ) -> Self {
        Self {
            ai_provider,
            text_extractor,
            upload_limit_bytes,
            json_body_limit_bytes: DEFAULT_JSON_BODY_LIMIT_BYTES,
        }
    }

    pub fn with_json_body_limit(mut self, limit_bytes: usize) -> Self {
        self.json_body_limit_bytes = limit_bytes;
        self
    }

    pub fn analyze_document_handler(&self) -> AnalyzeDocumentHandler {
        AnalyzeDocumentHandler::new(self.ai_provider.clone(), self.text_extractor.clone())
    }

    pub fn analyze_text_handler(&self) -> AnalyzeTextHandler {
        AnalyzeTextHandler::new(self.ai_provider.clone())
    }

    pub fn generate_scenarios_handler(&self) -> GenerateScenariosHandler {
        GenerateScenariosHandler::new(self.ai_provider.clone())
    }

    pub fn generate_test_cases_handler(&self) -> GenerateTestCasesHandler {
        GenerateTestCasesHandler::new(self.ai_provider.clone())
    }

    pub fn detect_conflicts_handler(&self) -> DetectConflictsHandler {
        DetectConflictsHandler::new(self.ai_provider.clone())
    }

    pub fn chat_handler(&self) -> ChatHandler {
        ChatHandler::new(self.ai_provider.clone())
    }

    pub fn analyze_gaps_handler(&self) -> AnalyzeGapsHandler {
        AnalyzeGapsHandler::new(self.ai_provider.clone())
    }

    pub fn detect_duplicates_handler(&self) -> DetectDuplicatesHandler {
        DetectDuplicatesHandler::new(self.ai_provider.clone())
    }
}

/// Logs a failed request under its endpoint name and converts it.
fn failed(endpoint: &'static str, err: AnalysisError) -> RelayError {
    if err.is_client_error() {
        tracing::debug!(endpoint, error = %err, "request rejected");
    } else {
        tracing::error!(endpoint, error = %err, "relay request failed");
    }
    RelayError::from(err)
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/health
pub async fn health(State(state): State<RelayAppState>) -> Json<HealthReply> {
    Json(HealthReply {
        status: "ok".to_string(),
        ai: true,
        model: state.ai_provider.provider_info().model,
    })
}

/// POST /api/ai/analyze-document - multipart upload or `{text, fileName}`
pub async fn analyze_document(
    State(state): State<RelayAppState>,
    DocumentUpload(command): DocumentUpload,
) -> Result<Json<DocumentAnalysisReply>, RelayError> {
    let result = state
        .analyze_document_handler()
        .handle(command)
        .await
        .map_err(|e| failed("analyze-document", e))?;

    Ok(Json(DocumentAnalysisReply::new(
        result.reply,
        Some(result.text_length),
    )))
}

/// POST /api/ai/analyze-text
pub async fn analyze_text(
    State(state): State<RelayAppState>,
    RelayJson(body): RelayJson<AnalyzeTextRequest>,
) -> Result<Json<DocumentAnalysisReply>, RelayError> {
    let command = AnalyzeTextCommand {
        text: body.text,
        file_name: body.file_name,
    };
    let reply = state
        .analyze_text_handler()
        .handle(command)
        .await
        .map_err(|e| failed("analyze-text", e))?;

    Ok(Json(DocumentAnalysisReply::new(reply, None)))
}

/// POST /api/ai/generate-scenarios
pub async fn generate_scenarios(
    State(state): State<RelayAppState>,
    RelayJson(body): RelayJson<RequirementsRequest>,
) -> Result<Json<ScenarioReply>, RelayError> {
    let command = GenerateScenariosCommand {
        requirements: body.requirements,
    };
    let reply = state
        .generate_scenarios_handler()
        .handle(command)
        .await
        .map_err(|e| failed("generate-scenarios", e))?;

    Ok(Json(reply.into()))
}

/// POST /api/ai/generate-testcases
pub async fn generate_test_cases(
    State(state): State<RelayAppState>,
    RelayJson(body): RelayJson<ScenarioRequest>,
) -> Result<Json<TestCaseReply>, RelayError> {
    let command = GenerateTestCasesCommand {
        scenario: body.scenario,
    };
    let reply = state
        .generate_test_cases_handler()
        .handle(command)
        .await
        .map_err(|e| failed("generate-testcases", e))?;

    Ok(Json(reply.into()))
}

/// POST /api/ai/detect-conflicts
pub async fn detect_conflicts(
    State(state): State<RelayAppState>,
    RelayJson(body): RelayJson<RequirementsRequest>,
) -> Result<Json<ConflictReply>, RelayError> {
    let command = DetectConflictsCommand {
        requirements: body.requirements,
    };
    let reply = state
        .detect_conflicts_handler()
        .handle(command)
        .await
        .map_err(|e| failed("detect-conflicts", e))?;

    Ok(Json(reply.into()))
}

/// POST /api/ai/chat
pub async fn chat(
    State(state): State<RelayAppState>,
    RelayJson(body): RelayJson<ChatRequest>,
) -> Result<Json<ChatReply>, RelayError> {
    let command = ChatCommand {
        message: body.message,
        context: body.context,
    };
    let reply = state
        .chat_handler()
        .handle(command)
        .await
        .map_err(|e| failed("chat", e))?;

    Ok(Json(ChatReply { reply }))
}

/// POST /api/ai/analyze-gaps
pub async fn analyze_gaps(
    State(state): State<RelayAppState>,
    RelayJson(body): RelayJson<GapAnalysisRequest>,
) -> Result<Json<GapReply>, RelayError> {
    let command = AnalyzeGapsCommand {
        test_files: body.test_files,
        documents: body.documents,
    };
    let reply = state
        .analyze_gaps_handler()
        .handle(command)
        .await
        .map_err(|e| failed("analyze-gaps", e))?;

    Ok(Json(reply.into()))
}

/// POST /api/ai/detect-duplicates
pub async fn detect_duplicates(
    State(state): State<RelayAppState>,
    RelayJson(body): RelayJson<DuplicateRequest>,
) -> Result<Json<DuplicateReply>, RelayError> {
    let command = DetectDuplicatesCommand { files: body.files };
    let reply = state
        .detect_duplicates_handler()
        .handle(command)
        .await
        .map_err(|e| failed("detect-duplicates", e))?;

    Ok(Json(reply.into()))
}

/// Fallback for unmatched routes.
pub async fn not_found() -> RelayError {
    RelayError::not_found()
}
