//! Reading snapshot and catalog endpoints

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::{
    api::{
        state::ApiState,
        types::{ReadingsResponse, STATUS_SUCCESS},
    },
    sampler::RngSampler,
    snapshot::{self, ReadingsSnapshot},
};

/// GET /api/readings
///
/// Synthesizes a fresh reading for every configured location and metric.
/// The values are not taken from the live generators.
pub async fn get_readings(State(state): State<ApiState>) -> Json<ReadingsResponse> {
    let ReadingsSnapshot {
        readings,
        timestamp,
    } = synthesize_now(&state);

    Json(ReadingsResponse {
        status: STATUS_SUCCESS.to_string(),
        readings,
        timestamp,
    })
}

fn synthesize_now(state: &ApiState) -> ReadingsSnapshot {
    let mut sampler = RngSampler::new(rand::thread_rng());
    snapshot::synthesize(&state.catalog, state.supervisor.locations(), &mut sampler)
}

/// GET /api/metrics
///
/// Lists the metric catalog with units, ranges and thresholds
pub async fn list_metrics(State(state): State<ApiState>) -> Json<Value> {
    Json(json!({
        "status": STATUS_SUCCESS,
        "metrics": state.catalog.metrics(),
    }))
}
