//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Amazon Bedrock model client and a mock provider
//! - `extraction` - PDF, Word and plain text extraction
//! - `http` - The relay's axum router, handlers and middleware
//! - `rate_limiter` - In-memory fixed-window limiter
//! - `relay_client` - reqwest client for a running relay
//! - `notice` - Notice sinks for the client orchestrator
//! - `storage` - Document store persistence

pub mod ai;
pub mod extraction;
pub mod http;
pub mod notice;
pub mod rate_limiter;
pub mod relay_client;
pub mod storage;

pub use ai::{BedrockProvider, MockAIProvider};
pub use extraction::FileTextExtractor;
pub use rate_limiter::InMemoryRateLimiter;
pub use relay_client::HttpRelayClient;
