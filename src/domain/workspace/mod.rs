//! Workspace module: the client's local view of uploaded documents.

mod document;
mod simulation;
mod store;

pub use document::{DocumentRow, DocumentStatus, ScoreSource};
pub use simulation::{
    SimulatedScores, AMBIGUITY_RANGE, COMPLETENESS_RANGE, SPECS_RANGE, STORIES_RANGE,
    TESTABILITY_RANGE,
};
pub use store::{DocumentStore, TrashedDocument};
