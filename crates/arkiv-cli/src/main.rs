#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use arkiv_server::handler::routes;
use arkiv_server::middleware::{CorsConfig, create_cors_layer};
use arkiv_server::service::ServiceState;
use axum::Router;
use clap::Parser;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{Cli, log_config};

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "arkiv_cli::server::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "arkiv_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "arkiv_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing();
    log_startup_info();
    log_config(&cli);

    cli.server
        .validate()
        .context("invalid server configuration")?;

    let state = ServiceState::from_config(cli.storage.to_storage_config())
        .await
        .context("failed to initialize storage backend")?;

    let router = create_router(state, &cli);

    server::serve(router, cli.server).await?;

    Ok(())
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Tracing (outermost) - request spans
/// 2. Timeout - bounds request processing
/// 3. CORS
/// 4. Routes (innermost) - actual request handlers
fn create_router(state: ServiceState, cli: &Cli) -> Router {
    let cors = CorsConfig {
        allowed_origins: cli.server.cors_allowed_origins.clone(),
        ..CorsConfig::default()
    };

    routes(state)
        .layer(create_cors_layer(&cors))
        .layer(TimeoutLayer::new(cli.server.request_timeout()))
        .layer(TraceLayer::new_for_http())
}

/// Initializes tracing with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Logs startup information.
fn log_startup_info() {
    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        "starting arkiv server"
    );

    tracing::debug!(
        target: TRACING_TARGET_STARTUP,
        pid = process::id(),
        arch = std::env::consts::ARCH,
        os = std::env::consts::OS,
        "build information"
    );
}
