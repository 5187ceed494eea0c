//! Lifecycle of the per-location generators.
//!
//! The supervisor owns the location registry: an entry exists exactly while a
//! location's generator is meant to run. Starting creates the entry and spawns
//! a fresh generator; stopping removes the entry and asks the generator to
//! exit after its current tick.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::{
    actors::generator::{GeneratorContext, GeneratorHandle},
    sampler::RngSampler,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationState {
    Running,
    Stopped,
}

impl fmt::Display for LocationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationState::Running => write!(f, "running"),
            LocationState::Stopped => write!(f, "stopped"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationStatus {
    pub location: String,
    pub state: LocationState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorError {
    /// The location is not part of the configuration
    UnknownLocation(String),
}

impl fmt::Display for SupervisorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupervisorError::UnknownLocation(name) => write!(f, "unknown location '{}'", name),
        }
    }
}

impl std::error::Error for SupervisorError {}

/// Starts and stops one generator per configured location.
#[derive(Debug, Clone)]
pub struct LocationSupervisor {
    /// Configured locations, in configuration order
    locations: Arc<Vec<String>>,

    context: GeneratorContext,

    /// Base seed; `None` seeds every generator from entropy
    seed: Option<u64>,

    /// Location registry
    registry: Arc<RwLock<HashMap<String, GeneratorHandle>>>,
}

impl LocationSupervisor {
    pub fn new(locations: Vec<String>, context: GeneratorContext, seed: Option<u64>) -> Self {
        Self {
            locations: Arc::new(locations),
            context,
            seed,
            registry: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    pub fn context(&self) -> &GeneratorContext {
        &self.context
    }

    /// Start every configured location that is not running yet.
    ///
    /// Returns the number of generators that were started.
    #[instrument(skip(self))]
    pub async fn start(&self) -> usize {
        let mut registry = self.registry.write().await;
        let mut started = 0;

        for location in self.locations.iter() {
            if is_live(&registry, location) {
                continue;
            }
            registry.insert(location.clone(), self.spawn_generator(location));
            started += 1;
        }

        info!("started {started} generators ({} running)", registry.len());
        started
    }

    /// Start a single configured location.
    ///
    /// Returns `false` if the location was already running.
    #[instrument(skip(self))]
    pub async fn start_location(&self, location: &str) -> Result<bool, SupervisorError> {
        if !self.is_configured(location) {
            warn!("refusing to start unknown location");
            return Err(SupervisorError::UnknownLocation(location.to_string()));
        }

        let mut registry = self.registry.write().await;
        if is_live(&registry, location) {
            debug!("location already running");
            return Ok(false);
        }
        if registry.contains_key(location) {
            warn!("previous generator exited on its own, replacing it");
        }

        registry.insert(location.to_string(), self.spawn_generator(location));
        info!("started generator");
        Ok(true)
    }

    /// Stop a location's generator.
    ///
    /// The registry entry is gone when this returns; the generator itself
    /// exits after finishing its current tick. The removed handle is returned
    /// so callers can wait for that with [`GeneratorHandle::stopped`].
    #[instrument(skip(self))]
    pub async fn stop(&self, location: &str) -> Option<GeneratorHandle> {
        let handle = self.registry.write().await.remove(location)?;

        if let Err(e) = handle.shutdown().await {
            debug!("generator already gone: {e:#}");
        }
        info!("stopped generator");

        Some(handle)
    }

    /// Stop every running generator.
    #[instrument(skip(self))]
    pub async fn stop_all(&self) -> Vec<GeneratorHandle> {
        let handles: Vec<_> = self.registry.write().await.drain().map(|(_, h)| h).collect();

        for handle in &handles {
            if let Err(e) = handle.shutdown().await {
                debug!("generator for {} already gone: {e:#}", handle.location);
            }
        }
        info!("stopped {} generators", handles.len());

        handles
    }

    pub async fn is_running(&self, location: &str) -> bool {
        is_live(&*self.registry.read().await, location)
    }

    /// Running locations, in configuration order.
    pub async fn running(&self) -> Vec<String> {
        let registry = self.registry.read().await;
        self.locations
            .iter()
            .filter(|l| is_live(&registry, l))
            .cloned()
            .collect()
    }

    /// State of every configured location.
    pub async fn status(&self) -> Vec<LocationStatus> {
        let registry = self.registry.read().await;
        self.locations
            .iter()
            .map(|location| LocationStatus {
                location: location.clone(),
                state: if is_live(&registry, location) {
                    LocationState::Running
                } else {
                    LocationState::Stopped
                },
            })
            .collect()
    }

    /// Look up the handle of a running generator.
    pub async fn handle(&self, location: &str) -> Option<GeneratorHandle> {
        self.registry
            .read()
            .await
            .get(location)
            .filter(|h| !h.is_stopped())
            .cloned()
    }

    pub fn is_configured(&self, location: &str) -> bool {
        self.locations.iter().any(|l| l == location)
    }

    fn spawn_generator(&self, location: &str) -> GeneratorHandle {
        let sampler = match self.seed {
            Some(seed) => RngSampler::seeded(self.location_seed(seed, location)),
            None => RngSampler::from_entropy(),
        };
        debug!("spawning generator for {location}");
        GeneratorHandle::spawn(location, sampler, self.context.clone())
    }

    /// Give every location its own deterministic stream.
    fn location_seed(&self, seed: u64, location: &str) -> u64 {
        let index = self
            .locations
            .iter()
            .position(|l| l == location)
            .unwrap_or_default() as u64;
        seed.wrapping_add(index)
    }
}

/// A registry entry only counts while its generator task is still alive.
///
/// Entries whose generator exited on its own are overwritten by the next start.
fn is_live(registry: &HashMap<String, GeneratorHandle>, location: &str) -> bool {
    registry
        .get(location)
        .is_some_and(|handle| !handle.is_stopped())
}
