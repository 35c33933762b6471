//! AnalyzeGapsHandler - Compares uploaded tests against parsed requirements.

use std::sync::Arc;

use crate::domain::analysis::{
    GapAnalysis, NamedText, PromptBuilder, RequirementDocument, StructuredReply,
};
use crate::ports::AIProvider;

use super::errors::AnalysisError;
use super::structured::complete_structured;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyzeGapsCommand {
    pub test_files: Vec<NamedText>,
    pub documents: Vec<RequirementDocument>,
}

pub type AnalyzeGapsResult = StructuredReply<GapAnalysis>;

pub struct AnalyzeGapsHandler {
    provider: Arc<dyn AIProvider>,
}

impl AnalyzeGapsHandler {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(&self, cmd: AnalyzeGapsCommand) -> Result<AnalyzeGapsResult, AnalysisError> {
        if cmd.test_files.is_empty() {
            return Err(AnalysisError::validation("No test files provided"));
        }
        if cmd.documents.is_empty() {
            return Err(AnalysisError::validation("No requirement documents provided"));
        }

        tracing::info!(
            test_files = cmd.test_files.len(),
            documents = cmd.documents.len(),
            "analyzing coverage gaps"
        );
        let prompt = PromptBuilder::gap_analysis(&cmd.test_files, &cmd.documents);
        Ok(complete_structured(self.provider.as_ref(), prompt).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;

    fn document() -> RequirementDocument {
        RequirementDocument {
            name: "checkout.pdf".to_string(),
            summary: Some("Checkout flow".to_string()),
            requirements: Vec::new(),
        }
    }

    #[tokio::test]
    async fn missing_test_files_are_rejected() {
        let handler = AnalyzeGapsHandler::new(Arc::new(MockAIProvider::new()));
        let cmd = AnalyzeGapsCommand {
            test_files: Vec::new(),
            documents: vec![document()],
        };
        let err = handler.handle(cmd).await.unwrap_err();
        assert_eq!(err.to_string(), "No test files provided");
    }

    #[tokio::test]
    async fn missing_documents_are_rejected() {
        let handler = AnalyzeGapsHandler::new(Arc::new(MockAIProvider::new()));
        let cmd = AnalyzeGapsCommand {
            test_files: vec![NamedText::new("tests.csv", "TC-1,login")],
            documents: Vec::new(),
        };
        let err = handler.handle(cmd).await.unwrap_err();
        assert_eq!(err.to_string(), "No requirement documents provided");
    }

    #[tokio::test]
    async fn gap_report_is_parsed() {
        let provider = MockAIProvider::new().with_response(
            r#"{"coverageScore": 64, "totalRequirements": 11, "coveredRequirements": 7,
                "gaps": [{"id": "GAP-001", "requirement": "Refunds", "severity": "high",
                "suggestedTests": ["refund full order"]}], "summary": "Refunds untested."}"#,
        );
        let handler = AnalyzeGapsHandler::new(Arc::new(provider.clone()));
        let cmd = AnalyzeGapsCommand {
            test_files: vec![NamedText::new("tests.csv", "TC-1,checkout happy path")],
            documents: vec![document()],
        };

        let reply = handler.handle(cmd).await.unwrap();

        assert_eq!(reply.value.coverage_score.value(), 64);
        assert_eq!(reply.value.covered_requirements, 7);
        assert_eq!(reply.value.gaps[0].suggested_tests.len(), 1);

        let call = provider.last_call().unwrap();
        assert!(call.user_message.contains("--- File: tests.csv ---"));
        assert!(call.user_message.contains("Document: checkout.pdf"));
    }
}
