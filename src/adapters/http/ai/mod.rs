//! HTTP adapter for the relay endpoints.
//!
//! - `GET /api/health` - Liveness plus the configured model
//! - `POST /api/ai/*` - One endpoint per model task

pub mod extract;
pub mod handlers;
pub mod routes;

pub use extract::{DocumentUpload, RelayJson};
pub use handlers::{not_found, RelayAppState};
pub use routes::{ai_routes, health_routes};
