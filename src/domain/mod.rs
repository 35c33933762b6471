//! Domain layer: pure types and logic, no I/O.
//!
//! - `foundation` - Shared value objects (ids, timestamps, percentages)
//! - `analysis` - Task kinds, prompt construction, reply schemas, JSON recovery
//! - `extraction` - Document kinds for text extraction
//! - `workspace` - Client-side document rows and store

pub mod analysis;
pub mod extraction;
pub mod foundation;
pub mod workspace;
