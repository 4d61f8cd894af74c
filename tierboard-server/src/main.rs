//! tierboard-server - Tier list backend
//!
//! Serves the tier list UI, stores uploaded images and persists the
//! arrangement of images into tiers as a single JSON snapshot.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tierboard_common::config::{resolve_data_dir, DataLayout, TomlConfig};
use tierboard_server::api::BUILD;
use tierboard_server::store::reconcile;
use tierboard_server::{build_router, AppState};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for tierboard-server
#[derive(Parser, Debug)]
#[command(name = "tierboard-server")]
#[command(about = "Tier list image ranking server")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides the config file)
    #[arg(short, long, env = "TIERBOARD_PORT")]
    port: Option<u16>,

    /// Interface to bind (overrides the config file)
    #[arg(long, env = "TIERBOARD_HOST")]
    host: Option<String>,

    /// Directory holding images/ and data/state.json
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, env = "TIERBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Adopt orphaned images and drop dangling entries at startup
    #[arg(long)]
    reconcile: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = TomlConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                let level = &config.logging.level;
                format!("tierboard_server={level},tierboard_common={level},tower_http={level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting {}", BUILD.banner());

    let layout = DataLayout::new(resolve_data_dir(args.data_dir.as_deref(), &config));
    layout
        .ensure_directories()
        .with_context(|| format!("Failed to create data directory {}", layout.root.display()))?;
    info!("Images directory: {}", layout.images_dir.display());
    info!("State file: {}", layout.state_file.display());

    let state = AppState::from_config(&layout, &config);

    let apply = args.reconcile || config.reconcile_on_startup;
    if let Err(e) = reconcile(&state.gateway, &state.assets, apply).await {
        warn!("Startup reconciliation skipped: {}", e);
    }

    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.host, config.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("tierboard-server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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
