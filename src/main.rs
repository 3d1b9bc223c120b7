//! todos-rs: a small todo service with concurrent tag search
//!
//! This is the main entry point for the application.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use todos_rs::{
    config, storage,
    web::{create_router, AppState, ROUTES},
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Command line flags; they override the settings file and environment
#[derive(Debug, Parser)]
#[command(name = "todos-rs", version, about = "A small todo service with concurrent tag search")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Address to serve HTTP, as host:port
    #[arg(long, env = "TODOS_HTTP", value_name = "ADDR")]
    http: Option<String>,

    /// SQLite database path or `:memory:`; empty keeps todos in memory
    #[arg(long, value_name = "DSN")]
    dsn: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let (mut settings, source) = config::load(cli.config.as_deref())?;
    if let Some(ref addr) = cli.http {
        settings.set_http_addr(addr)?;
    }
    if let Some(dsn) = cli.dsn {
        settings.storage.dsn = Some(dsn);
    }

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting todos-rs v{}", todos_rs::VERSION);
    match source {
        Some(path) => info!("Loaded settings from: {}", path.display()),
        None => info!("No settings file found, using defaults"),
    }

    // Select storage
    let repo = storage::open(&settings.storage).await;

    let addr = settings.socket_addr()?;
    let state = AppState::new(settings, repo);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);
    for (method, path) in ROUTES {
        info!("  [{}]\t{}", method, path);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Done");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    info!("Initiate shutdown ...");
}
