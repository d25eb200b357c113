//! CLI configuration management.
//!
//! The configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── server: ServerConfig    # Host, port, timeouts, CORS origins
//! └── storage: StorageArgs    # Backend choice + S3 connection settings
//! ```
//!
//! Everything can be provided via CLI arguments or environment
//! variables. Use `--help` to see all available options.

mod server;
mod storage;

use clap::Parser;
pub use server::ServerConfig;
pub use storage::{Backend, StorageArgs};

use crate::TRACING_TARGET_CONFIG;

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "arkiv")]
#[command(about = "arkiv file-archive server")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// Storage backend configuration.
    #[clap(flatten)]
    pub storage: StorageArgs,
}

/// Logs the effective configuration with secrets masked.
pub fn log_config(cli: &Cli) {
    tracing::info!(
        target: TRACING_TARGET_CONFIG,
        addr = %cli.server.server_addr(),
        request_timeout_secs = cli.server.request_timeout,
        shutdown_timeout_secs = cli.server.shutdown_timeout,
        cors_origins = ?cli.server.cors_allowed_origins,
        "server configuration"
    );

    tracing::info!(
        target: TRACING_TARGET_CONFIG,
        backend = ?cli.storage.backend,
        bucket = %cli.storage.bucket,
        region = %cli.storage.region,
        endpoint = ?cli.storage.endpoint,
        access_key = %cli.storage.access_key_masked(),
        use_ssl = cli.storage.use_ssl,
        force_path_style = cli.storage.force_path_style,
        "storage configuration"
    );
}
