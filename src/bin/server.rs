//! Standalone VAT lookup server.
//!
//! Serves `POST /fetch-vat-details` for the checkout field-sync scripts.
//! Configuration comes from the environment; see
//! [`timologio::server::ServerConfig`].

use timologio::server::{AppState, ServerConfig, router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    let addr = config.socket_addr();
    let state = AppState::new(config);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "timologio lookup server listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
