//! Text Extractor Port - Plain text from uploaded documents.

use async_trait::async_trait;

/// Errors raised while turning file bytes into text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    #[error("failed to read PDF: {0}")]
    Pdf(String),

    #[error("failed to read Word document: {0}")]
    Word(String),

    /// The blocking extraction task panicked or was cancelled.
    #[error("extraction task failed: {0}")]
    TaskFailed(String),
}

/// Port for text extraction.
///
/// Zero-byte input never fails. Parser failures are reported once; callers
/// do not retry.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, bytes: Vec<u8>, file_name: &str) -> Result<String, ExtractionError>;
}
