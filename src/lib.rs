pub mod actors;
pub mod alerts;
pub mod catalog;
pub mod config;
pub mod hub;
pub mod sampler;
pub mod snapshot;
pub mod supervisor;
pub mod util;

#[cfg(feature = "api")]
pub mod api;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single measured value together with its unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub value: f64,
    pub unit: String,
}

/// One tick worth of readings for a location.
///
/// Readings are keyed by metric name. A sorted map keeps the serialized
/// payload stable between ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub location: String,
    pub timestamp: DateTime<Utc>,
    pub readings: BTreeMap<String, Reading>,
}

/// A reading that reached its metric's alert threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub location: String,

    /// Name of the metric that breached; dashboards know this as `disaster_type`
    #[serde(rename = "disaster_type")]
    pub metric: String,

    pub value: f64,
    pub unit: String,
    pub timestamp: DateTime<Utc>,
}
