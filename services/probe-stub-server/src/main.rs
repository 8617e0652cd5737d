//! # Probe Stub Server
//!
//! Serves the probed API surface as stubs

use anyhow::Context;
use probe_core::BUILD_INFO;
use probe_stub_server::{app, ServerConfig};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,probe_stub_server=debug".into()),
        )
        .init();

    info!("Starting Probe Stub Server {}", BUILD_INFO);

    let config = ServerConfig::from_env()?;
    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Probe Stub Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app()).await?;

    Ok(())
}
