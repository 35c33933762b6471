//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `BedrockProvider` - Amazon Bedrock InvokeModel (Claude, Titan, generic)
//! - `MockAIProvider` - Configurable mock for testing

mod bedrock_provider;
mod mock_provider;
mod model_family;
mod sigv4;

pub use bedrock_provider::{BedrockAuth, BedrockConfig, BedrockProvider};
pub use mock_provider::{MockAIProvider, MockError, MockResponse};
pub use model_family::ModelFamily;
pub use sigv4::{AwsCredentials, SignedHeaders};
