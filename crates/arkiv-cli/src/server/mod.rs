//! HTTP server startup with lifecycle management.

mod http_server;
mod shutdown;

pub use http_server::serve;
pub(crate) use shutdown::shutdown_signal;
