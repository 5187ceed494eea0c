//! API response types
//!
//! Every endpoint answers with one of these explicit shapes so clients never
//! have to guess which fields are present.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Alert, Reading, Sample, supervisor::LocationStatus};

/// Status marker carried by the success responses
pub const STATUS_SUCCESS: &str = "success";

/// Event name used for samples on the stream
pub const SAMPLE_EVENT: &str = "disaster_data";

/// Response for GET /api/health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

/// Response for GET /api/alerts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsResponse {
    pub status: String,
    pub alerts: Vec<Alert>,
}

/// Response for GET /api/readings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingsResponse {
    pub status: String,

    /// location → metric → reading
    pub readings: BTreeMap<String, BTreeMap<String, Reading>>,

    pub timestamp: DateTime<Utc>,
}

/// Response for GET /api/locations and the start/stop endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationsResponse {
    pub status: String,
    pub locations: Vec<LocationStatus>,
}

/// Response for GET /api/stats
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub timestamp: String,
    pub subscribers: usize,
    pub pending_alerts: usize,
    pub running_locations: Vec<String>,
    pub configured_locations: usize,
    pub metrics: usize,
}

/// Envelope for messages pushed over the WebSocket stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamEvent {
    pub event: String,
    pub data: Sample,
}

impl StreamEvent {
    pub fn sample(sample: Sample) -> Self {
        Self {
            event: SAMPLE_EVENT.to_string(),
            data: sample,
        }
    }
}
