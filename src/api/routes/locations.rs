//! Location lifecycle endpoints

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};
use tracing::info;

use crate::api::{
    error::{ApiError, ApiResult},
    state::ApiState,
    types::{LocationsResponse, STATUS_SUCCESS},
};

/// GET /api/locations
///
/// Lists every configured location with its generator state
pub async fn list_locations(State(state): State<ApiState>) -> Json<LocationsResponse> {
    Json(locations_response(&state).await)
}

/// POST /api/locations/:location/start
pub async fn start_location(
    State(state): State<ApiState>,
    location: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<LocationsResponse>> {
    let Path(location) = location?;
    if state.supervisor.start_location(&location).await? {
        info!("location {location} started via API");
    }

    Ok(Json(locations_response(&state).await))
}

/// POST /api/locations/:location/stop
///
/// The generator finishes its current tick before it exits
pub async fn stop_location(
    State(state): State<ApiState>,
    location: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<LocationsResponse>> {
    let Path(location) = location?;
    if !state.supervisor.is_configured(&location) {
        return Err(ApiError::NotFound(format!("unknown location '{location}'")));
    }

    if state.supervisor.stop(&location).await.is_some() {
        info!("location {location} stopped via API");
    }

    Ok(Json(locations_response(&state).await))
}

async fn locations_response(state: &ApiState) -> LocationsResponse {
    LocationsResponse {
        status: STATUS_SUCCESS.to_string(),
        locations: state.supervisor.status().await,
    }
}
