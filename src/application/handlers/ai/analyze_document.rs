//! AnalyzeDocumentHandler - Scores an uploaded file or pasted text.

use std::sync::Arc;

use crate::domain::analysis::{
    AnalysisRequest, DocumentAnalysis, PromptBuilder, StructuredReply,
};
use crate::ports::{AIProvider, TextExtractor};

use super::errors::AnalysisError;
use super::structured::complete_structured;

/// An uploaded file as received by the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Command to analyze a document.
///
/// An uploaded file wins over `text`; `file_name` only names pasted text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyzeDocumentCommand {
    pub file: Option<UploadedFile>,
    pub text: Option<String>,
    pub file_name: Option<String>,
}

/// Result of a document analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeDocumentResult {
    pub reply: StructuredReply<DocumentAnalysis>,
    /// Characters of the untrimmed source text.
    pub text_length: usize,
}

pub struct AnalyzeDocumentHandler {
    provider: Arc<dyn AIProvider>,
    extractor: Arc<dyn TextExtractor>,
}

impl AnalyzeDocumentHandler {
    pub fn new(provider: Arc<dyn AIProvider>, extractor: Arc<dyn TextExtractor>) -> Self {
        Self {
            provider,
            extractor,
        }
    }

    pub async fn handle(
        &self,
        cmd: AnalyzeDocumentCommand,
    ) -> Result<AnalyzeDocumentResult, AnalysisError> {
        let request = match (cmd.file, cmd.text.filter(|t| !t.is_empty())) {
            (Some(file), _) => {
                let text = self.extractor.extract(file.bytes, &file.file_name).await?;
                AnalysisRequest::document(text, Some(file.file_name))
            }
            (None, Some(text)) => AnalysisRequest::document(text, cmd.file_name),
            (None, None) => {
                return Err(AnalysisError::validation("No file or text provided"));
            }
        };

        if !request.is_long_enough() {
            return Err(AnalysisError::validation(
                "Document text too short to analyze (min 50 chars)",
            ));
        }

        let text_length = request.text_length();
        tracing::info!(file_name = %request.source_name, text_length, "analyzing document");

        let prompt = PromptBuilder::document_analysis(&request.source_text, &request.source_name);
        let reply = complete_structured(self.provider.as_ref(), prompt).await?;

        Ok(AnalyzeDocumentResult { reply, text_length })
    }
}
