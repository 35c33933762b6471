//! TestCraft relay server.
//!
//! Loads configuration from the environment, builds the Bedrock provider and
//! serves the relay router until interrupted.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use testcraft_relay::adapters::ai::BedrockProvider;
use testcraft_relay::adapters::extraction::FileTextExtractor;
use testcraft_relay::adapters::http::{relay_router, RelayAppState};
use testcraft_relay::adapters::rate_limiter::InMemoryRateLimiter;
use testcraft_relay::config::AppConfig;
use testcraft_relay::ports::AIProvider;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    if config.is_production() {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    config.validate()?;

    let provider = BedrockProvider::new(config.ai.bedrock_config()?)?;
    let model = provider.provider_info().model;
    let state = RelayAppState::new(
        Arc::new(provider),
        Arc::new(FileTextExtractor::new()),
        config.server.upload_limit_bytes,
    );
    let limiter = Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone()));

    let app = relay_router(state, limiter, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, %model, environment = ?config.server.environment, "relay listening");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
