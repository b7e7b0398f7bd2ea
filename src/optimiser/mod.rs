//! Optimisers that integrate derivative estimates into the raw parameter estimate.

use crate::error::Result;

pub mod gradient;
pub mod switching;

pub use gradient::GradientOptimiser;
pub use switching::{Step, SwitchingOptimiser};

/// Common contract of every optimiser.
pub trait Optimiser {
    /// Step gain `k`; its sign picks ascent or descent.
    fn set_gain(&mut self, gain: f64) -> Result<()>;
    /// Integration step; the switching optimiser uses it as the dither frequency.
    fn set_sampling_time(&mut self, sampling_time: f64) -> Result<()>;
    /// Consumes one derivative vector and returns the updated estimate.
    fn update(&mut self, derivatives: &[f64]) -> Result<f64>;
    /// Number of derivatives `update` expects.
    fn derivative_count(&self) -> usize;
    /// Raw estimate `theta_bar`.
    fn estimate(&self) -> f64;
    /// Restores the initial condition.
    fn reset(&mut self);
    /// Replaces the initial condition and restores it.
    fn reset_to(&mut self, x0: f64) -> Result<()>;
}
