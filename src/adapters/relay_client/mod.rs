//! Relay client adapters.
//!
//! - `HttpRelayClient` - Calls a running relay over HTTP

mod http_relay_client;

pub use http_relay_client::{HttpRelayClient, RelayClientConfig};
