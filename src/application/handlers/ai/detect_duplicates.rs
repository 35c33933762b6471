//! DetectDuplicatesHandler - Groups duplicate and overlapping test cases.

use std::sync::Arc;

use crate::domain::analysis::{DuplicateReport, NamedText, PromptBuilder, StructuredReply};
use crate::ports::AIProvider;

use super::errors::AnalysisError;
use super::structured::complete_structured;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectDuplicatesCommand {
    pub files: Vec<NamedText>,
}

pub type DetectDuplicatesResult = StructuredReply<DuplicateReport>;

pub struct DetectDuplicatesHandler {
    provider: Arc<dyn AIProvider>,
}

impl DetectDuplicatesHandler {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(
        &self,
        cmd: DetectDuplicatesCommand,
    ) -> Result<DetectDuplicatesResult, AnalysisError> {
        if cmd.files.is_empty() {
            return Err(AnalysisError::validation("No test files provided"));
        }

        let prompt = PromptBuilder::duplicate_detection(&cmd.files);
        Ok(complete_structured(self.provider.as_ref(), prompt).await?)
    }
}
