//! Errors raised while serving a relay request.

use thiserror::Error;

use crate::ports::{AIError, ExtractionError};

/// Failure of a single relay request.
///
/// Only validation and upload failures are the caller's fault; extraction
/// and model failures are reported with their display text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("{0}")]
    Validation(String),

    #[error("File exceeds the {limit_bytes} byte upload limit")]
    UploadTooLarge { limit_bytes: usize },

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Model(#[from] AIError),
}

impl AnalysisError {
    pub fn validation(message: impl Into<String>) -> Self {
        AnalysisError::Validation(message.into())
    }

    /// Whether the request itself was unacceptable.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AnalysisError::Validation(_) | AnalysisError::UploadTooLarge { .. }
        )
    }
}
