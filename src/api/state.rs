//! API shared state

use std::sync::Arc;

use crate::{
    alerts::AlertBuffer, catalog::MetricCatalog, hub::BroadcastHub,
    supervisor::LocationSupervisor,
};

/// Shared state passed to all API handlers
#[derive(Debug, Clone)]
pub struct ApiState {
    /// Metric catalog used for synthesized readings
    pub catalog: Arc<MetricCatalog>,

    /// Pending alerts, drained by `GET /api/alerts`
    pub alerts: AlertBuffer,

    /// Hub the WebSocket clients subscribe to
    pub hub: BroadcastHub,

    /// Generator lifecycle control
    pub supervisor: LocationSupervisor,
}

impl ApiState {
    /// Build the state from a supervisor, sharing its catalog, buffer and hub
    pub fn new(supervisor: LocationSupervisor) -> Self {
        let context = supervisor.context();
        Self {
            catalog: context.catalog.clone(),
            alerts: context.alerts.clone(),
            hub: context.hub.clone(),
            supervisor,
        }
    }
}
