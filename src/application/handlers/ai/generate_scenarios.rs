//! GenerateScenariosHandler - Turns requirements into test scenarios.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::analysis::{PromptBuilder, ScenarioSet, StructuredReply};
use crate::ports::AIProvider;

use super::errors::AnalysisError;
use super::structured::complete_structured;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateScenariosCommand {
    /// Requirement objects exactly as the client sent them.
    pub requirements: Vec<Value>,
}

pub type GenerateScenariosResult = StructuredReply<ScenarioSet>;

pub struct GenerateScenariosHandler {
    provider: Arc<dyn AIProvider>,
}

impl GenerateScenariosHandler {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(
        &self,
        cmd: GenerateScenariosCommand,
    ) -> Result<GenerateScenariosResult, AnalysisError> {
        if cmd.requirements.is_empty() {
            return Err(AnalysisError::validation("No requirements provided"));
        }

        tracing::info!(count = cmd.requirements.len(), "generating scenarios");
        let prompt = PromptBuilder::scenario_generation(&Value::Array(cmd.requirements));
        Ok(complete_structured(self.provider.as_ref(), prompt).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::domain::analysis::{ScenarioCategory, ScenarioPriority, ScenarioType};
    use serde_json::json;

    #[tokio::test]
    async fn empty_requirements_are_rejected() {
        let provider = MockAIProvider::new();
        let handler = GenerateScenariosHandler::new(Arc::new(provider.clone()));

        let err = handler
            .handle(GenerateScenariosCommand::default())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "No requirements provided");
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn scenarios_are_parsed() {
        let provider = MockAIProvider::new().with_response(
            r#"{"scenarios": [{"id": "SC-001", "title": "Login works", "category": "E2E",
                "priority": "P1", "type": "positive", "requirement": "REQ-001",
                "steps": ["open", "log in"], "expectedResult": "dashboard"}]}"#,
        );
        let handler = GenerateScenariosHandler::new(Arc::new(provider.clone()));
        let cmd = GenerateScenariosCommand {
            requirements: vec![json!({"id": "REQ-001", "title": "Login"})],
        };

        let reply = handler.handle(cmd).await.unwrap();

        assert!(reply.is_structured());
        let scenario = &reply.value.scenarios[0];
        assert_eq!(scenario.category, ScenarioCategory::E2e);
        assert_eq!(scenario.priority, ScenarioPriority::P1);
        assert_eq!(scenario.scenario_type, ScenarioType::Positive);
        assert_eq!(scenario.steps.len(), 2);
        assert!(provider.last_call().unwrap().user_message.contains("REQ-001"));
    }

    #[tokio::test]
    async fn unparseable_reply_yields_empty_set() {
        let provider = MockAIProvider::new().with_response("no json today");
        let handler = GenerateScenariosHandler::new(Arc::new(provider));
        let cmd = GenerateScenariosCommand {
            requirements: vec![json!({"id": "REQ-001"})],
        };

        let reply = handler.handle(cmd).await.unwrap();
        assert!(!reply.is_structured());
        assert!(reply.value.scenarios.is_empty());
    }
}
