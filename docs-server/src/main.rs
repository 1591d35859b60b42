//! Docs server binary.
//!
//! Serves rendered Markdown documents to the frontend and receives GitHub
//! push webhooks for the content repository.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use docs::{build_router, AppState, Config, MarkdownFetcher};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the environment may already be set
    let _ = dotenvy::dotenv();

    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("docs_server_starting");

    let config = Config::from_env();
    info!(
        port = config.port,
        webhook_secret_configured = config.webhook_secret().is_some(),
        content_url_template = %config.content_url_template,
        fetch_timeout_ms = config.fetch_timeout_ms,
        tracked_refs = ?config.tracked_refs,
        topics = config.topics.len(),
        cors_allowed_origins = ?config.cors_allowed_origins,
        "config_loaded"
    );

    let fetcher = MarkdownFetcher::new(config.content_url_template.clone(), config.fetch_timeout())
        .context("Failed to build HTTP client")?;

    let port = config.port;
    let state = AppState::new(config, fetcher);
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "docs_server_listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("docs_server_shutdown_complete");

    Ok(())
}

/// Resolves on SIGINT or SIGTERM so in-flight requests can drain.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!(signal = "SIGINT", "shutdown_signal_received"),
        _ = terminate => info!(signal = "SIGTERM", "shutdown_signal_received"),
    }

    info!("docs_server_shutting_down");
}
