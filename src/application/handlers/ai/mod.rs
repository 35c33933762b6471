//! Relay handlers.
//!
//! One command handler per relay endpoint. Each validates its command,
//! builds the prompt, makes exactly one model call and, for structured
//! tasks, recovers the JSON reply.
//!
//! ## Documents
//! - Analyze an uploaded file or pasted text
//! - Analyze imported text
//!
//! ## Test design
//! - Generate scenarios from requirements
//! - Generate test cases from a scenario
//! - Detect requirement conflicts
//! - Analyze coverage gaps
//! - Detect duplicate tests
//!
//! ## Conversation
//! - Chat with the QA co-pilot

mod analyze_document;
mod analyze_gaps;
mod analyze_text;
mod chat;
mod detect_conflicts;
mod detect_duplicates;
mod errors;
mod generate_scenarios;
mod generate_test_cases;
mod structured;

pub use analyze_document::{
    AnalyzeDocumentCommand, AnalyzeDocumentHandler, AnalyzeDocumentResult, UploadedFile,
};
pub use analyze_gaps::{AnalyzeGapsCommand, AnalyzeGapsHandler, AnalyzeGapsResult};
pub use analyze_text::{AnalyzeTextCommand, AnalyzeTextHandler, AnalyzeTextResult};
pub use chat::{ChatCommand, ChatHandler};
pub use detect_conflicts::{DetectConflictsCommand, DetectConflictsHandler, DetectConflictsResult};
pub use detect_duplicates::{
    DetectDuplicatesCommand, DetectDuplicatesHandler, DetectDuplicatesResult,
};
pub use errors::AnalysisError;
pub use generate_scenarios::{
    GenerateScenariosCommand, GenerateScenariosHandler, GenerateScenariosResult,
};
pub use generate_test_cases::{
    GenerateTestCasesCommand, GenerateTestCasesHandler, GenerateTestCasesResult,
};
