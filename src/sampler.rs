//! Random draws behind the reading generators.
//!
//! Generation code only talks to the [`Sampler`] trait so tests can force a
//! branch (always spike, never spike) or replay a fixed sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Reading, catalog::MetricDefinition};

/// Number of decimal digits kept on every reading
pub const PRECISION: i32 = 2;

pub trait Sampler {
    /// Draw `true` with the given probability.
    fn spike(&mut self, probability: f64) -> bool;

    /// Draw uniformly from the inclusive range `[low, high]`.
    fn uniform(&mut self, low: f64, high: f64) -> f64;
}

/// [`Sampler`] backed by a `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSampler<R = StdRng> {
    rng: R,
}

impl<R: Rng> RngSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSampler<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Sampler for RngSampler<R> {
    fn spike(&mut self, probability: f64) -> bool {
        if probability.is_nan() {
            return false;
        }
        self.rng.gen_bool(probability.clamp(0.0, 1.0))
    }

    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if low >= high {
            return low;
        }
        self.rng.gen_range(low..=high)
    }
}

pub fn round_to_precision(value: f64) -> f64 {
    let factor = 10f64.powi(PRECISION);
    (value * factor).round() / factor
}

/// Produce one reading for `definition`.
///
/// With probability `spike_probability` the value is drawn from
/// `[alert_threshold, max]`, otherwise from `[min, alert_threshold - margin]`.
/// The rounded value never leaves the band it was drawn from.
pub fn generate_reading(
    definition: &MetricDefinition,
    sampler: &mut impl Sampler,
    spike_probability: f64,
) -> Reading {
    let (low, high) = if sampler.spike(spike_probability) {
        (definition.alert_threshold, definition.max)
    } else {
        (
            definition.min,
            definition.alert_threshold - crate::catalog::NORMAL_MARGIN,
        )
    };

    let draw = sampler.uniform(low, high);
    debug_assert!(
        (low..=high).contains(&draw),
        "draw {draw} for {} outside [{low}, {high}]",
        definition.name
    );

    Reading {
        value: round_to_precision(draw).clamp(low, high),
        unit: definition.unit.clone(),
    }
}

/// Produce a reading anywhere in `[min, max]`, ignoring the spike split.
pub fn generate_unbiased_reading(
    definition: &MetricDefinition,
    sampler: &mut impl Sampler,
) -> Reading {
    let draw = sampler.uniform(definition.min, definition.max);
    Reading {
        value: round_to_precision(draw).clamp(definition.min, definition.max),
        unit: definition.unit.clone(),
    }
}
