//! Liveness endpoint.

use axum::Json;
use serde::Serialize;

use crate::domain::foundation::Timestamp;

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

/// GET /health - Always `ok` while the process is serving requests.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Timestamp::now().to_wire(),
    })
}
