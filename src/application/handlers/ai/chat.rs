//! ChatHandler - Free-form questions to the QA co-pilot.

use std::sync::Arc;

use crate::domain::analysis::PromptBuilder;
use crate::ports::{AIProvider, CompletionRequest};

use super::errors::AnalysisError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatCommand {
    pub message: Option<String>,
    /// Project summary supplied by the client.
    pub context: Option<String>,
}

pub struct ChatHandler {
    provider: Arc<dyn AIProvider>,
}

impl ChatHandler {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self { provider }
    }

    /// Returns the model's reply verbatim.
    pub async fn handle(&self, cmd: ChatCommand) -> Result<String, AnalysisError> {
        let message = cmd
            .message
            .filter(|m| !m.is_empty())
            .ok_or_else(|| AnalysisError::validation("No message provided"))?;

        let prompt = PromptBuilder::chat(&message, cmd.context.as_deref());
        let response = self.provider.complete(CompletionRequest::from(prompt)).await?;
        Ok(response.content)
    }
}
