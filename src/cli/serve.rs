use crate::api::{AppState, build_router};
use crate::core::RateSource;
use crate::core::config::ServerConfig;
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Runs the HTTP API until interrupted.
pub async fn serve(server: &ServerConfig, source: Arc<dyn RateSource>) -> Result<()> {
    let bind_addr = format!("{}:{}", server.host, server.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {bind_addr}"))?;

    info!(host = %server.host, port = server.port, "nbp-rates listening");

    let app = build_router(AppState::new(source));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server runtime error")?;

    info!("nbp-rates stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
