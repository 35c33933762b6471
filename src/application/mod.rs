//! Application layer - Handlers and orchestration.
//!
//! - `handlers` - One command handler per relay endpoint
//! - `orchestrator` - Client-side coordination of relay calls over the
//!   document store

pub mod handlers;
pub mod orchestrator;

pub use handlers::AnalysisError;
pub use orchestrator::ClientOrchestrator;
