//! DetectConflictsHandler - Finds contradictions and gaps between requirements.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::analysis::{ConflictReport, PromptBuilder, StructuredReply};
use crate::ports::AIProvider;

use super::errors::AnalysisError;
use super::structured::complete_structured;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectConflictsCommand {
    pub requirements: Vec<Value>,
}

pub type DetectConflictsResult = StructuredReply<ConflictReport>;

pub struct DetectConflictsHandler {
    provider: Arc<dyn AIProvider>,
}

impl DetectConflictsHandler {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(
        &self,
        cmd: DetectConflictsCommand,
    ) -> Result<DetectConflictsResult, AnalysisError> {
        if cmd.requirements.is_empty() {
            return Err(AnalysisError::validation("No requirements provided"));
        }

        let prompt = PromptBuilder::conflict_detection(&Value::Array(cmd.requirements));
        Ok(complete_structured(self.provider.as_ref(), prompt).await?)
    }
}
