//! AnalyzeTextHandler - Scores text imported from a URL or issue tracker.

use std::sync::Arc;

use crate::domain::analysis::{AnalysisRequest, DocumentAnalysis, PromptBuilder, StructuredReply};
use crate::ports::AIProvider;

use super::errors::AnalysisError;
use super::structured::complete_structured;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyzeTextCommand {
    pub text: Option<String>,
    pub file_name: Option<String>,
}

pub type AnalyzeTextResult = StructuredReply<DocumentAnalysis>;

pub struct AnalyzeTextHandler {
    provider: Arc<dyn AIProvider>,
}

impl AnalyzeTextHandler {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(&self, cmd: AnalyzeTextCommand) -> Result<AnalyzeTextResult, AnalysisError> {
        let request = AnalysisRequest::document(cmd.text.unwrap_or_default(), cmd.file_name);
        if !request.is_long_enough() {
            return Err(AnalysisError::validation("Text too short to analyze"));
        }

        let prompt = PromptBuilder::document_analysis(&request.source_text, &request.source_name);
        Ok(complete_structured(self.provider.as_ref(), prompt).await?)
    }
}
