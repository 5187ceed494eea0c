//! Alert query endpoint

use axum::{Json, extract::State};
use tracing::debug;

use crate::api::{
    state::ApiState,
    types::{AlertsResponse, STATUS_SUCCESS},
};

/// GET /api/alerts
///
/// Returns every pending alert and clears them, so each alert is reported
/// by exactly one request.
pub async fn get_alerts(State(state): State<ApiState>) -> Json<AlertsResponse> {
    let alerts = state.alerts.drain_all().await;
    debug!("handing out {} alerts", alerts.len());

    Json(AlertsResponse {
        status: STATUS_SUCCESS.to_string(),
        alerts,
    })
}
