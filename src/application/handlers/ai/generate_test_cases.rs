//! GenerateTestCasesHandler - Expands one scenario into Given/When/Then cases.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::analysis::{PromptBuilder, StructuredReply, TestCaseSet};
use crate::ports::AIProvider;

use super::errors::AnalysisError;
use super::structured::complete_structured;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateTestCasesCommand {
    pub scenario: Option<Value>,
}

pub type GenerateTestCasesResult = StructuredReply<TestCaseSet>;

pub struct GenerateTestCasesHandler {
    provider: Arc<dyn AIProvider>,
}

impl GenerateTestCasesHandler {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(
        &self,
        cmd: GenerateTestCasesCommand,
    ) -> Result<GenerateTestCasesResult, AnalysisError> {
        let scenario = cmd
            .scenario
            .filter(is_truthy)
            .ok_or_else(|| AnalysisError::validation("No scenario provided"))?;

        let prompt = PromptBuilder::test_case_generation(&scenario);
        Ok(complete_structured(self.provider.as_ref(), prompt).await?)
    }
}

/// JavaScript truthiness, which the browser client relies on.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
