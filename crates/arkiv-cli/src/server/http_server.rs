//! HTTP server startup and lifecycle management.

use std::io;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::server::shutdown_signal;
use crate::{TRACING_TARGET_SHUTDOWN, TRACING_TARGET_STARTUP};

/// Starts the HTTP server with graceful shutdown.
///
/// Binds to the configured address and serves requests until a shutdown
/// signal arrives, then drains in-flight connections.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server
/// encounters a fatal error during operation.
pub async fn serve(app: Router, config: ServerConfig) -> io::Result<()> {
    let addr = config.server_addr();
    let listener = TcpListener::bind(addr).await.inspect_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_STARTUP,
            addr = %addr,
            error = %err,
            "failed to bind server address"
        );
    })?;

    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        addr = %addr,
        "server is ready and listening for connections"
    );

    if config.binds_to_all_interfaces() {
        tracing::warn!(
            target: TRACING_TARGET_STARTUP,
            "server is bound to all interfaces, ensure firewall rules are properly configured"
        );
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.shutdown_timeout()))
        .await
        .inspect_err(|err| {
            tracing::error!(
                target: TRACING_TARGET_SHUTDOWN,
                error = %err,
                "server encountered an error"
            );
        })?;

    tracing::info!(target: TRACING_TARGET_SHUTDOWN, "server shut down gracefully");
    Ok(())
}
