//! Hub statistics endpoint

use axum::{Json, extract::State};

use crate::api::{state::ApiState, types::StatsResponse};

/// GET /api/stats
///
/// Returns subscriber and alert counts together with the running locations
pub async fn get_stats(State(state): State<ApiState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        timestamp: chrono::Utc::now().to_rfc3339(),
        subscribers: state.hub.subscriber_count(),
        pending_alerts: state.alerts.len().await,
        running_locations: state.supervisor.running().await,
        configured_locations: state.supervisor.locations().len(),
        metrics: state.catalog.len(),
    })
}
