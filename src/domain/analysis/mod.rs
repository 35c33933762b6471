//! Analysis module: prompts, reply schemas and JSON recovery.
//!
//! Everything here is pure. The model client lives behind
//! [`crate::ports::AIProvider`]; this module only shapes what goes in and
//! interprets what comes out.

mod inputs;
mod prompt;
mod recovery;
mod schema;
mod task;

pub use inputs::{NamedText, RequirementDocument, RequirementRef};
pub use prompt::{
    truncate_chars, ModelPrompt, PromptBuilder, DOCUMENT_CHAR_LIMIT, DUPLICATE_FILE_CHAR_LIMIT,
    GAP_FILE_CHAR_LIMIT, REQUIREMENTS_CHAR_LIMIT,
};
pub use recovery::{
    recover, recover_list, recover_value, strip_code_fences, Recovered, StructuredReply,
};
pub use schema::{
    AdditionalTest, Conflict, ConflictReport, CoverageGap, DocumentAnalysis, DocumentIssue,
    DuplicateGroup, DuplicateKind, DuplicateReport, DuplicateStats, ExtractedRequirement,
    GapAnalysis, Level, Preconditions, ProjectOverview, ProjectRisk, Recommendation, ReplySchema,
    RequirementGap, RequirementReview, RequirementReviewSet, Scenario, ScenarioCategory,
    ScenarioPriority, ScenarioSet, ScenarioType, TestCase, TestCaseEnhancement, TestCaseSet,
    MAX_EXTRACTED_REQUIREMENTS, MAX_ISSUES,
};
pub use task::{AnalysisRequest, TaskKind, CHAT_MAX_TOKENS, DEFAULT_MAX_TOKENS, MIN_DOCUMENT_CHARS};
