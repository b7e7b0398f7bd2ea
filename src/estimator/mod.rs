//! Derivative estimators that demodulate the performance signal against the
//! dither reference.

use crate::dither::DitherGenerator;
use crate::error::{EsError, Result};

pub mod gradient;
pub mod gradient_hessian;

pub use gradient::GradientEstimator;
pub use gradient_hessian::GradientHessianObserver;

/// Dither signal an estimator demodulates against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reference {
    pub frequency: f64,
    pub phase: f64,
    /// `None` when the estimator folds the amplitude into its gain
    pub amplitude: Option<f64>,
}

impl Reference {
    /// Whether `dither` produces this reference, up to rounding.
    pub fn matches(&self, dither: &dyn DitherGenerator) -> bool {
        close(self.frequency, dither.frequency())
            && close(self.phase, dither.phase())
            && self.amplitude.map_or(true, |a| close(a, dither.amplitude()))
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

/// Common contract of every estimator.
///
/// `update` returns `true` when a new estimate was published on this tick.
pub trait Estimator {
    /// Sets the per-channel filter frequencies; the slice length must equal the channel count.
    fn set_estimator_frequencies(&mut self, frequencies: &[f64]) -> Result<()>;
    /// Sets the per-channel gains; the slice length must equal the channel count.
    fn set_gains(&mut self, gains: &[f64]) -> Result<()>;
    fn set_sampling_time(&mut self, sampling_time: f64) -> Result<()>;
    /// Re-derives the demodulation reference from `dither`.
    fn lock_to(&mut self, dither: &dyn DitherGenerator) -> Result<()>;
    fn reference(&self) -> Reference;
    /// Consumes one (filtered) measurement at time `t`.
    fn update(&mut self, u: f64, t: f64) -> bool;
    /// Last published estimate of `channel`, `None` past the channel count.
    fn estimate(&self, channel: usize) -> Option<f64>;
    fn estimates(&self) -> &[f64];
    /// Number of published derivatives (1 or 2).
    fn states_number(&self) -> usize;
    /// Zeroes the demodulator memory, keeping the configuration.
    fn reset(&mut self);
}

/// Zero-order-hold smoothing coefficient for a first-order lag of bandwidth `rate`.
pub(crate) fn smoothing_coefficient(rate: f64, sampling_time: f64) -> f64 {
    sampling_time / (1.0 / rate + sampling_time)
}

/// Publishes every `every`-th tick.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Decimator {
    every: usize,
    count: usize,
}

impl Decimator {
    pub(crate) fn new(every: usize) -> Result<Self> {
        if every == 0 {
            return Err(EsError::InvalidArgument(
                "decimation must be >= 1".to_string(),
            ));
        }
        Ok(Self { every, count: 0 })
    }

    pub(crate) fn every(&self) -> usize {
        self.every
    }

    pub(crate) fn tick(&mut self) -> bool {
        self.count += 1;
        if self.count >= self.every {
            self.count = 0;
            true
        } else {
            false
        }
    }

    pub(crate) fn reset(&mut self) {
        self.count = 0;
    }
}
