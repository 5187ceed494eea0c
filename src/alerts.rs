//! Alert detection and the shared buffer of pending alerts.
//!
//! Generators call [`detect`] on every sample they produce and append the
//! result to an [`AlertBuffer`]. The buffer is drained by the alert query,
//! which hands every pending alert out exactly once.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::trace;

use crate::{
    Alert, Reading, Sample,
    catalog::{MetricCatalog, MetricDefinition},
};

/// Whether a reading has reached its metric's alert threshold.
///
/// Callers pass the rounded value that is also broadcast, so an alert always
/// carries exactly the value subscribers have seen.
pub fn is_alert(reading: &Reading, definition: &MetricDefinition) -> bool {
    reading.value >= definition.alert_threshold
}

/// Build one alert per breaching reading of `sample`, in catalog order.
///
/// Readings for metrics unknown to the catalog are ignored.
pub fn detect(sample: &Sample, catalog: &MetricCatalog) -> Vec<Alert> {
    catalog
        .iter()
        .filter_map(|definition| {
            let reading = sample.readings.get(&definition.name)?;
            is_alert(reading, definition).then(|| Alert {
                location: sample.location.clone(),
                metric: definition.name.clone(),
                value: reading.value,
                unit: reading.unit.clone(),
                timestamp: sample.timestamp,
            })
        })
        .collect()
}

/// Pending alerts shared between all generators and the query path.
///
/// Append and drain take the same lock, so a concurrent append lands either
/// in the current drain or in the next one.
#[derive(Debug, Clone, Default)]
pub struct AlertBuffer {
    pending: Arc<Mutex<Vec<Alert>>>,
}

impl AlertBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn append(&self, alert: Alert) {
        self.pending.lock().await.push(alert);
    }

    /// Append several alerts in one critical section, preserving their order.
    pub async fn extend(&self, alerts: Vec<Alert>) {
        if alerts.is_empty() {
            return;
        }
        let mut pending = self.pending.lock().await;
        pending.extend(alerts);
        trace!("{} alerts pending", pending.len());
    }

    /// Take every pending alert and leave the buffer empty.
    pub async fn drain_all(&self) -> Vec<Alert> {
        std::mem::take(&mut *self.pending.lock().await)
    }

    pub async fn len(&self) -> usize {
        self.pending.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.pending.lock().await.is_empty()
    }
}
