//! `hn-server`: serves the hn-clone API documentation.
//!
//! Usage:
//!   hn-server [--config <path>] [--listen <addr>]

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use hn_server::{AppState, ServerConfig, docs_service, init_tracing, router};
use tracing::info;

/// Hacker News clone API documentation server.
#[derive(Parser, Debug)]
#[command(name = "hn-server", about = "Serve the merged OpenAPI document and docs viewer")]
struct Cli {
    /// Path to the TOML config file.
    #[arg(short = 'c', long = "config", env = "HN_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address (overrides the config file).
    #[arg(long = "listen")]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info");

    let cli = Cli::parse();
    let mut config = ServerConfig::load(cli.config.as_deref())?;
    if let Some(listen) = cli.listen {
        config.listen = listen;
    }
    info!(
        listen = %config.listen,
        environment = ?config.environment,
        "Loaded configuration"
    );

    let docs = docs_service(&config)?;
    let app = router(AppState::new(docs, !config.environment.is_production()));

    let listener = tokio::net::TcpListener::bind(&config.listen)
        .await
        .with_context(|| format!("failed to bind {}", config.listen))?;
    info!("Server is running on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
