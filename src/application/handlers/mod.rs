//! Application handlers.
//!
//! Command handlers behind the relay's HTTP endpoints.

pub mod ai;

pub use ai::{
    AnalysisError, AnalyzeDocumentCommand, AnalyzeDocumentHandler, AnalyzeDocumentResult,
    AnalyzeGapsCommand, AnalyzeGapsHandler, AnalyzeTextCommand, AnalyzeTextHandler, ChatCommand,
    ChatHandler, DetectConflictsCommand, DetectConflictsHandler, DetectDuplicatesCommand,
    DetectDuplicatesHandler, GenerateScenariosCommand, GenerateScenariosHandler,
    GenerateTestCasesCommand, GenerateTestCasesHandler, UploadedFile,
};
