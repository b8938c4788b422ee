//! TermChat Server — real-time terminal chat relay
//!
//! Main entry point that wires all crates together and starts the server.

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use termchat_api::{RelayState, health_router, relay_router};
use termchat_auth::{CredentialStore, JsonFilePersistence};
use termchat_core::config::AppConfig;
use termchat_core::error::AppError;
use termchat_realtime::RelayEngine;

/// TermChat relay server
#[derive(Debug, Parser)]
#[command(name = "termchat-server", version, about, long_about = None)]
struct Args {
    /// Directory holding `default.toml` and `<env>.toml`
    #[arg(short, long, default_value = "config")]
    config: String,

    /// Environment overlay to load
    #[arg(short, long, env = "TERMCHAT_ENV", default_value = "development")]
    env: String,

    /// Override `server.port`
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match load_configuration(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from files, environment and flags
fn load_configuration(args: &Args) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load(&args.config, &args.env)?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    Ok(config)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting TermChat v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Load the credential store ────────────────────────
    tracing::info!("Loading credential store from '{}'...", config.store.path);
    let store = CredentialStore::load(JsonFilePersistence::new(&config.store.path))?;
    tracing::info!(identities = store.len(), "Credential store loaded");

    // ── Step 2: Start the relay engine ───────────────────────────
    let (engine, engine_task) = RelayEngine::spawn(store, &config.realtime);

    // ── Step 3: Start the health responder ───────────────────────
    let health_handle = if config.health.enabled {
        let addr = format!("{}:{}", config.server.host, config.health.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;
        tracing::info!("Health check listening on {}{}", addr, config.health.path);

        let app = health_router(&config.health.path);
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await
            {
                tracing::error!("Health server error: {}", e);
            }
        });
        Some(handle)
    } else {
        tracing::info!("Health check disabled");
        None
    };

    // ── Step 4: Start the WebSocket relay ────────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("TermChat relay listening on {}", addr);

    let app = relay_router(RelayState::new(engine.clone()));
    let shutdown_engine = engine.clone();

    // ── Step 5: Graceful shutdown ────────────────────────────────
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, closing connections...");
        shutdown_engine.shutdown();
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    // ── Step 6: Wait for background tasks ────────────────────────
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    engine.shutdown();
    if tokio::time::timeout(grace, engine_task).await.is_err() {
        tracing::warn!("Relay engine did not stop within {:?}", grace);
    }
    if let Some(handle) = health_handle {
        let _ = tokio::time::timeout(grace, handle).await;
    }

    let metrics = engine.metrics();
    tracing::info!(
        connections_opened = metrics.connections_opened,
        frames_received = metrics.frames_received,
        frames_sent = metrics.frames_sent,
        frames_dropped = metrics.frames_dropped,
        malformed_payloads = metrics.malformed_payloads,
        "TermChat server shut down gracefully"
    );
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
