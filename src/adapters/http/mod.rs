//! HTTP adapters - the relay's REST surface.
//!
//! - `ai` - Health and model endpoints
//! - `middleware` - Rate limiting
//! - `router` - The assembled application

pub mod ai;
pub mod error;
pub mod middleware;
pub mod router;

pub use ai::RelayAppState;
pub use error::RelayError;
pub use router::relay_router;
