use std::collections::HashSet;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use tracing::trace;

use crate::catalog::{CatalogError, MetricCatalog, MetricDefinition, default_metrics};

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    /// Locations that get a generator on startup
    #[serde(default = "default_locations")]
    pub locations: Vec<String>,

    /// Metric definitions (defaults to the built-in catalog)
    #[serde(default = "default_metrics")]
    pub metrics: Vec<MetricDefinition>,

    /// Time between two ticks of a generator
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Probability of a reading being drawn from the alert band
    #[serde(default = "default_spike_probability")]
    pub spike_probability: f64,

    /// Seed for reproducible runs; each location derives its own stream from it
    pub seed: Option<u64>,

    /// Samples buffered per subscriber before it starts lagging
    #[serde(default = "default_hub_capacity")]
    pub hub_capacity: usize,

    /// HTTP/WebSocket server settings
    #[serde(default)]
    pub api: ApiSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locations: default_locations(),
            metrics: default_metrics(),
            interval_ms: default_interval_ms(),
            spike_probability: default_spike_probability(),
            seed: None,
            hub_capacity: default_hub_capacity(),
            api: ApiSettings::default(),
        }
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct ApiSettings {
    #[serde(default = "crate::util::get_default_bind_addr")]
    pub bind_addr: SocketAddr,

    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            bind_addr: crate::util::get_default_bind_addr(),
            enable_cors: default_enable_cors(),
        }
    }
}

fn default_locations() -> Vec<String> {
    ["A", "B", "C", "D", "E"].map(String::from).to_vec()
}

fn default_interval_ms() -> u64 {
    1000
}

fn default_spike_probability() -> f64 {
    0.05
}

fn default_hub_capacity() -> usize {
    crate::hub::DEFAULT_CAPACITY
}

fn default_enable_cors() -> bool {
    true
}

/// Errors found while validating a configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NoLocations,
    EmptyLocation,
    DuplicateLocation(String),
    InvalidSpikeProbability(f64),
    ZeroInterval,
    ZeroHubCapacity,
    Catalog(CatalogError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoLocations => write!(f, "at least one location must be configured"),
            ConfigError::EmptyLocation => write!(f, "location names must not be empty"),
            ConfigError::DuplicateLocation(name) => {
                write!(f, "location '{}' is configured twice", name)
            }
            ConfigError::InvalidSpikeProbability(p) => {
                write!(f, "spike probability {} is outside [0, 1]", p)
            }
            ConfigError::ZeroInterval => write!(f, "tick interval must be positive"),
            ConfigError::ZeroHubCapacity => write!(f, "hub capacity must be positive"),
            ConfigError::Catalog(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Catalog(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CatalogError> for ConfigError {
    fn from(err: CatalogError) -> Self {
        ConfigError::Catalog(err)
    }
}

impl Config {
    /// Check every setting and build the metric catalog from it.
    pub fn validate(&self) -> Result<MetricCatalog, ConfigError> {
        if self.locations.is_empty() {
            return Err(ConfigError::NoLocations);
        }

        let mut seen = HashSet::new();
        for location in &self.locations {
            if location.trim().is_empty() {
                return Err(ConfigError::EmptyLocation);
            }
            if !seen.insert(location.as_str()) {
                return Err(ConfigError::DuplicateLocation(location.clone()));
            }
        }

        if !(0.0..=1.0).contains(&self.spike_probability) {
            return Err(ConfigError::InvalidSpikeProbability(self.spike_probability));
        }

        if self.interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }

        if self.hub_capacity == 0 {
            return Err(ConfigError::ZeroHubCapacity);
        }

        Ok(MetricCatalog::new(self.metrics.clone())?)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

pub fn read_config_file(path: &str) -> anyhow::Result<Config> {
    let file_content = std::fs::read_to_string(path)?;
    serde_json::from_str(&file_content)
        .map_err(|e| anyhow::anyhow!("Invalid configuration file provided: {e}"))
        .inspect(|config| trace!("loaded config: {config:?}"))
}
