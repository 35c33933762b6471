//! Task kinds and the per-request analysis input.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum trimmed length, in characters, of a document worth analyzing.
pub const MIN_DOCUMENT_CHARS: usize = 50;

/// Completion budget for structured tasks unless configured otherwise.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Completion budget for conversational replies.
pub const CHAT_MAX_TOKENS: u32 = 2048;

/// The kind of work a relay request asks the model to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskKind {
    DocumentAnalysis,
    ScenarioGeneration,
    TestCaseGeneration,
    ConflictDetection,
    Chat,
    GapAnalysis,
    DuplicateDetection,
}

impl TaskKind {
    /// Stable name used in logs and error context.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::DocumentAnalysis => "document-analysis",
            TaskKind::ScenarioGeneration => "scenario-generation",
            TaskKind::TestCaseGeneration => "testcase-generation",
            TaskKind::ConflictDetection => "conflict-detection",
            TaskKind::Chat => "chat",
            TaskKind::GapAnalysis => "gap-analysis",
            TaskKind::DuplicateDetection => "duplicate-detection",
        }
    }

    /// Fixed completion budget for this task.
    ///
    /// `None` leaves the budget to the provider's configured default.
    pub fn max_tokens(&self) -> Option<u32> {
        match self {
            TaskKind::Chat => Some(CHAT_MAX_TOKENS),
            _ => None,
        }
    }

    /// Whether the model is asked to reply with a JSON document.
    pub fn expects_json(&self) -> bool {
        !matches!(self, TaskKind::Chat)
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document submitted for analysis.
///
/// Created per user action and dropped once the reply is handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub source_text: String,
    pub source_name: String,
    pub task_kind: TaskKind,
}

impl AnalysisRequest {
    /// Builds a document-analysis request, defaulting the name to `document`.
    pub fn document(source_text: impl Into<String>, source_name: Option<String>) -> Self {
        Self {
            source_text: source_text.into(),
            source_name: source_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| "document".to_string()),
            task_kind: TaskKind::DocumentAnalysis,
        }
    }

    /// Character count of the source text, as reported back to callers.
    pub fn text_length(&self) -> usize {
        self.source_text.chars().count()
    }

    /// Whether the trimmed text meets [`MIN_DOCUMENT_CHARS`].
    pub fn is_long_enough(&self) -> bool {
        self.source_text.trim().chars().count() >= MIN_DOCUMENT_CHARS
    }
}
