//! ReadingGeneratorActor - Produces samples for one location
//!
//! Each location gets its own generator actor. On every tick it samples one
//! reading per catalog metric, records alerts for readings at or above their
//! threshold and publishes the sample to the broadcast hub.
//!
//! ## Message Flow
//!
//! ```text
//! Timer tick → Sample readings → Detect alerts → AlertBuffer
//!     ↑                               ↓
//!     │                        Publish Sample → BroadcastHub → [subscribers]
//!     └─── Commands (TickNow, UpdateInterval, Shutdown)
//! ```
//!
//! Commands are only looked at between ticks, so a shutdown request lets the
//! current tick finish before the actor exits.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, MissedTickBehavior, interval, interval_at};
use tracing::{debug, instrument, trace};

use crate::{
    Sample,
    alerts::{self, AlertBuffer},
    catalog::MetricCatalog,
    hub::BroadcastHub,
    sampler::{Sampler, generate_reading},
};

use super::messages::GeneratorCommand;

/// Everything a generator shares with the rest of the process
#[derive(Debug, Clone)]
pub struct GeneratorContext {
    /// Metrics sampled on every tick
    pub catalog: Arc<MetricCatalog>,

    /// Destination for threshold breaches
    pub alerts: AlertBuffer,

    /// Destination for every produced sample
    pub hub: BroadcastHub,

    /// Time between two ticks
    pub interval: Duration,

    /// Probability of a reading being drawn from the alert band
    pub spike_probability: f64,
}

/// Sample every metric of `catalog` once for `location`.
pub fn generate_sample(
    location: &str,
    catalog: &MetricCatalog,
    sampler: &mut impl Sampler,
    spike_probability: f64,
) -> Sample {
    let readings: BTreeMap<_, _> = catalog
        .iter()
        .map(|metric| {
            (
                metric.name.clone(),
                generate_reading(metric, sampler, spike_probability),
            )
        })
        .collect();

    Sample {
        location: location.to_string(),
        timestamp: Utc::now(),
        readings,
    }
}

/// Actor that generates readings for a single location
pub struct ReadingGeneratorActor<S> {
    location: String,

    context: GeneratorContext,

    /// Source of random draws, owned by this actor alone
    sampler: S,

    /// Command receiver for control messages
    command_rx: mpsc::Receiver<GeneratorCommand>,

    /// Current tick interval
    interval_duration: Duration,
}

impl<S: Sampler> ReadingGeneratorActor<S> {
    pub fn new(
        location: String,
        sampler: S,
        context: GeneratorContext,
        command_rx: mpsc::Receiver<GeneratorCommand>,
    ) -> Self {
        let interval_duration = context.interval;
        Self {
            location,
            context,
            sampler,
            command_rx,
            interval_duration,
        }
    }

    /// Run the actor's main loop
    ///
    /// This runs until:
    /// - A Shutdown command is received
    /// - Every handle for this actor has been dropped
    #[instrument(skip(self), fields(location = %self.location))]
    pub async fn run(mut self) {
        debug!("starting generator actor");

        let mut ticker = interval(self.interval_duration);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(GeneratorCommand::TickNow { respond_to }) => {
                            debug!("received TickNow command");
                            let sample = self.tick().await;
                            let _ = respond_to.send(sample);
                        }

                        Some(GeneratorCommand::UpdateInterval { interval_ms }) => {
                            debug!("updating interval to {interval_ms}ms");
                            self.interval_duration = Duration::from_millis(interval_ms.max(1));
                            // next tick is one full interval away, not immediate
                            ticker = interval_at(
                                Instant::now() + self.interval_duration,
                                self.interval_duration,
                            );
                            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                        }

                        Some(GeneratorCommand::Shutdown) => {
                            debug!("received shutdown command");
                            break;
                        }

                        None => {
                            debug!("command channel closed, shutting down");
                            break;
                        }
                    }
                }

                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }

        debug!("generator actor stopped");
    }

    /// Produce one sample, record its alerts and publish it.
    ///
    /// Delivery problems are logged here and never end the actor.
    async fn tick(&mut self) -> Sample {
        let sample = generate_sample(
            &self.location,
            &self.context.catalog,
            &mut self.sampler,
            self.context.spike_probability,
        );

        let alerts = alerts::detect(&sample, &self.context.catalog);
        if !alerts.is_empty() {
            debug!("{} readings reached their alert threshold", alerts.len());
            self.context.alerts.extend(alerts).await;
        }

        let receivers = self.context.hub.publish(sample.clone());
        trace!("tick delivered to {receivers} subscribers");

        sample
    }
}

/// Handle for controlling a ReadingGeneratorActor
///
/// The handle can be cloned. The actor exits on an explicit shutdown or once
/// every clone of its handle has been dropped.
#[derive(Debug, Clone)]
pub struct GeneratorHandle {
    /// Command sender
    sender: mpsc::Sender<GeneratorCommand>,

    /// Location this generator produces samples for
    pub location: String,
}

impl GeneratorHandle {
    /// Spawn a new generator actor
    ///
    /// The first tick fires immediately, subsequent ticks follow the
    /// configured interval.
    pub fn spawn<S>(location: impl Into<String>, sampler: S, context: GeneratorContext) -> Self
    where
        S: Sampler + Send + 'static,
    {
        let location = location.into();
        let (cmd_tx, cmd_rx) = mpsc::channel(32);

        let actor = ReadingGeneratorActor::new(location.clone(), sampler, context, cmd_rx);
        tokio::spawn(actor.run());

        Self {
            sender: cmd_tx,
            location,
        }
    }

    /// Produce a sample right away and return it
    pub async fn tick_now(&self) -> Result<Sample> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(GeneratorCommand::TickNow { respond_to: tx })
            .await
            .context("failed to send TickNow command")?;

        rx.await.context("failed to receive sample")
    }

    /// Update the tick interval
    pub async fn update_interval(&self, interval_ms: u64) -> Result<()> {
        self.sender
            .send(GeneratorCommand::UpdateInterval { interval_ms })
            .await
            .context("failed to send UpdateInterval command")?;
        Ok(())
    }

    /// Ask the generator to stop after its current tick
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(GeneratorCommand::Shutdown)
            .await
            .context("failed to send Shutdown command")?;
        Ok(())
    }

    /// Wait until the generator task has exited
    pub async fn stopped(&self) {
        self.sender.closed().await;
    }

    pub fn is_stopped(&self) -> bool {
        self.sender.is_closed()
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}
