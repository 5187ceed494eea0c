//! Health check and banner endpoints

use crate::api::types::HealthResponse;
use axum::Json;

/// GET /
pub async fn home() -> &'static str {
    "Disaster monitoring hub is running!"
}

/// GET /about
pub async fn about() -> &'static str {
    "Disaster monitoring hub - simulated environmental sensors with threshold alerts"
}

/// GET /api/health
///
/// Returns a simple health check response
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
