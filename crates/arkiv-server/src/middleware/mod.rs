//! HTTP middleware configuration.

mod cors;

pub use cors::{CorsConfig, create_cors_layer};
