//! Client-side orchestration over the relay.

mod client_orchestrator;

pub use client_orchestrator::{
    ClientOrchestrator, ANALYSIS_FALLBACK_NOTICE, CONFLICTS_FALLBACK_NOTICE,
    CONFLICTS_NEED_REQUIREMENTS, NO_PARSED_DOCUMENTS_FOR_SCENARIOS, SERVER_UNAVAILABLE_NOTICE,
    UNSTRUCTURED_NOTICE,
};
