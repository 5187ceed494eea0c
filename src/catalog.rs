//! Static definitions of the monitored metrics.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Distance kept between a normal reading and the alert threshold.
pub const NORMAL_MARGIN: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDefinition {
    pub name: String,
    pub unit: String,
    pub min: f64,
    pub max: f64,
    pub alert_threshold: f64,
}

impl MetricDefinition {
    pub fn new(name: &str, unit: &str, min: f64, max: f64, alert_threshold: f64) -> Self {
        Self {
            name: name.to_string(),
            unit: unit.to_string(),
            min,
            max,
            alert_threshold,
        }
    }

    /// Check the range invariants of a single definition.
    ///
    /// The threshold has to lie strictly inside `[min, max]` and leave room
    /// for a normal reading below it.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let values = [self.min, self.max, self.alert_threshold];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(CatalogError::InvalidRange {
                metric: self.name.clone(),
                reason: "bounds must be finite numbers".to_string(),
            });
        }

        if self.min >= self.max {
            return Err(CatalogError::InvalidRange {
                metric: self.name.clone(),
                reason: format!("min {} is not below max {}", self.min, self.max),
            });
        }

        if self.alert_threshold <= self.min || self.alert_threshold >= self.max {
            return Err(CatalogError::InvalidRange {
                metric: self.name.clone(),
                reason: format!(
                    "threshold {} must lie strictly inside [{}, {}]",
                    self.alert_threshold, self.min, self.max
                ),
            });
        }

        if self.alert_threshold - NORMAL_MARGIN < self.min {
            return Err(CatalogError::InvalidRange {
                metric: self.name.clone(),
                reason: format!(
                    "threshold {} leaves no room for normal readings above {}",
                    self.alert_threshold, self.min
                ),
            });
        }

        Ok(())
    }
}

/// Errors raised while building a catalog
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// The catalog holds no metrics at all
    Empty,

    /// Two definitions share a name
    DuplicateMetric(String),

    /// A definition violates `min < threshold < max`
    InvalidRange { metric: String, reason: String },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Empty => write!(f, "metric catalog must not be empty"),
            CatalogError::DuplicateMetric(name) => write!(f, "metric '{}' is defined twice", name),
            CatalogError::InvalidRange { metric, reason } => {
                write!(f, "invalid range for metric '{}': {}", metric, reason)
            }
        }
    }
}

impl std::error::Error for CatalogError {}

/// Ordered, validated set of metric definitions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MetricCatalog {
    metrics: Vec<MetricDefinition>,
}

impl MetricCatalog {
    pub fn new(metrics: Vec<MetricDefinition>) -> Result<Self, CatalogError> {
        if metrics.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for metric in &metrics {
            metric.validate()?;
            if !seen.insert(metric.name.as_str()) {
                return Err(CatalogError::DuplicateMetric(metric.name.clone()));
            }
        }

        Ok(Self { metrics })
    }

    pub fn metrics(&self) -> &[MetricDefinition] {
        &self.metrics
    }

    pub fn get(&self, name: &str) -> Option<&MetricDefinition> {
        self.metrics.iter().find(|m| m.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricDefinition> {
        self.metrics.iter()
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

impl Default for MetricCatalog {
    fn default() -> Self {
        Self {
            metrics: default_metrics(),
        }
    }
}

pub fn default_metrics() -> Vec<MetricDefinition> {
    vec![
        MetricDefinition::new("earthquake", "Richter", 0.0, 10.0, 6.0),
        MetricDefinition::new("temperature", "°C", -20.0, 50.0, 40.0),
        MetricDefinition::new("wind_speed", "km/h", 0.0, 200.0, 120.0),
        MetricDefinition::new("rainfall", "mm", 0.0, 300.0, 200.0),
        MetricDefinition::new("air_pressure", "hPa", 900.0, 1100.0, 950.0),
    ]
}
