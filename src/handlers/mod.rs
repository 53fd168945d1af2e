// Handlers module
// HTTP handlers for the todo REST API

pub mod todos;

use axum::{http::StatusCode, response::IntoResponse};
use tracing::info;

/// Liveness probe.
/// GET /
pub async fn health_check() -> impl IntoResponse {
    info!("Status request received");
    (StatusCode::OK, "OK\n")
}
