//! On-demand point-in-time readings.
//!
//! A snapshot is synthesized fresh for every request: each reading is drawn
//! uniformly over the metric's full `[min, max]` range and is unrelated to the
//! samples the live generators are streaming. No alerts are raised for it.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    Reading,
    catalog::MetricCatalog,
    sampler::{Sampler, generate_unbiased_reading},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingsSnapshot {
    /// location → metric → reading
    pub readings: BTreeMap<String, BTreeMap<String, Reading>>,
    pub timestamp: DateTime<Utc>,
}

pub fn synthesize(
    catalog: &MetricCatalog,
    locations: &[String],
    sampler: &mut impl Sampler,
) -> ReadingsSnapshot {
    let readings = locations
        .iter()
        .map(|location| {
            let per_metric = catalog
                .iter()
                .map(|metric| (metric.name.clone(), generate_unbiased_reading(metric, sampler)))
                .collect();
            (location.clone(), per_metric)
        })
        .collect();

    ReadingsSnapshot {
        readings,
        timestamp: Utc::now(),
    }
}
