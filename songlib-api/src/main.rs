//! songlib-api - Song library REST service
//!
//! Startup: arguments → TOML config → tracing → database + migrations →
//! song-info client → HTTP server (graceful shutdown on Ctrl+C / SIGTERM).

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};

use songlib_api::enrichment::HttpSongInfoClient;
use songlib_api::{build_router, AppState};
use songlib_common::config::{load_toml_config, ServiceConfig};
use songlib_common::db::init_database;
use songlib_common::logging::init_tracing;

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config =
        load_toml_config(args.config.as_deref()).context("Failed to load configuration")?;
    let config = ServiceConfig::resolve(args.overrides(), toml_config);

    init_tracing(&config.logging).context("Failed to initialize logging")?;

    info!(
        "Starting songlib-api v{} ({} logging)",
        env!("CARGO_PKG_VERSION"),
        config.logging.level
    );
    info!("Database path: {}", config.database_path.display());
    info!("Song-info endpoint: {}", config.external_api_url);

    let pool = init_database(&config.database_path)
        .await
        .context("Failed to initialize database")?;
    info!("✓ Database ready");

    let timeout = config.external_api_timeout_secs.map(Duration::from_secs);
    let song_info = HttpSongInfoClient::new(config.external_api_url.clone(), timeout)
        .context("Failed to build song-info client")?;

    let state = AppState::new(pool.clone(), Arc::new(song_info));
    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("songlib-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
