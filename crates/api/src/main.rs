//! Roombook - meeting-room booking service
//!
//! Main entry point for the HTTP server.

use std::sync::Arc;

use anyhow::Context;
use roombook_api::utils::logging::init_tracing;
use roombook_api::{router, AppContext};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before anything reads the environment
    let dotenv = dotenvy::dotenv();
    init_tracing();
    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(err) => info!(error = %err, "no .env file loaded"),
    }

    let config = roombook_infra::config::load().context("failed to load configuration")?;
    let bind_addr = config.server.bind_addr.clone();

    let ctx = Arc::new(AppContext::new(config).context("failed to initialise application")?);
    let shutdown = ctx.shutdown.clone();

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!(addr = %bind_addr, "roombook listening");

    axum::serve(listener, router(ctx))
        .with_graceful_shutdown(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(error = %err, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            info!("shutting down; cancelling in-flight bookings");
            shutdown.cancel();
        })
        .await
        .context("server error")?;

    Ok(())
}
