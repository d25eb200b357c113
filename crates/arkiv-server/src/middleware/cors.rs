//! CORS (Cross-Origin Resource Sharing) middleware configuration.

use std::time::Duration;

use axum::http::{HeaderValue, Method, header};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

/// Creates a CORS layer based on the provided configuration.
///
/// With no origins configured, any origin is allowed and credentials are
/// disabled (the archive frontend is served from arbitrary hosts).
/// Credentials can only be enabled together with an explicit origin
/// list.
pub fn create_cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
        .expose_headers([header::CONTENT_LENGTH])
        .max_age(config.max_age());

    if config.allowed_origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer
            .allow_origin(config.to_header_values())
            .allow_credentials(config.allow_credentials)
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct CorsConfig {
    /// List of allowed CORS origins. Empty means any origin.
    pub allowed_origins: Vec<String>,

    /// Maximum age for CORS preflight requests in seconds.
    pub max_age_seconds: u64,

    /// Whether to allow credentials in CORS requests. Only honored when
    /// an explicit origin list is configured.
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            max_age_seconds: 3600,
            allow_credentials: false,
        }
    }
}

impl CorsConfig {
    /// Returns the CORS max age as a Duration.
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_seconds)
    }

    /// Converts configured origins to a HeaderValue list.
    pub fn to_header_values(&self) -> Vec<HeaderValue> {
        self.allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect()
    }
}
