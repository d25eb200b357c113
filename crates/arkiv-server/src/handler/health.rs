//! Health check handler.

use axum::Json;
use axum::Router;
use axum::routing::get;

use crate::handler::response::HealthResponse;
use crate::service::ServiceState;

/// Returns the health routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/health", get(health))
}

/// Reports liveness without touching the storage backend.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: jiff::Timestamp::now().as_second(),
        service: env!("CARGO_PKG_NAME").to_string(),
    })
}
