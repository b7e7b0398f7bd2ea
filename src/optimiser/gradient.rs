use crate::error::{ensure_finite, ensure_len, ensure_positive, Result};
use crate::optimiser::Optimiser;

/// Discrete integrator `x += k ts du`.
///
/// A positive gain climbs the measured signal, a negative gain descends it.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientOptimiser {
    gain: f64,
    sampling_time: f64,
    x0: f64,
    x: f64,
}

impl GradientOptimiser {
    /// Create a new gradient optimiser starting at `x0`
    pub fn new(gain: f64, sampling_time: f64, x0: f64) -> Result<Self> {
        ensure_finite("optimiser gain", gain)?;
        ensure_positive("sampling time", sampling_time)?;
        ensure_finite("initial estimate", x0)?;
        Ok(Self {
            gain,
            sampling_time,
            x0,
            x: x0,
        })
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }
}

impl Optimiser for GradientOptimiser {
    fn set_gain(&mut self, gain: f64) -> Result<()> {
        ensure_finite("optimiser gain", gain)?;
        self.gain = gain;
        Ok(())
    }

    fn set_sampling_time(&mut self, sampling_time: f64) -> Result<()> {
        ensure_positive("sampling time", sampling_time)?;
        self.sampling_time = sampling_time;
        Ok(())
    }

    fn update(&mut self, derivatives: &[f64]) -> Result<f64> {
        ensure_len("derivative vector", 1, derivatives.len())?;
        self.x += self.gain * self.sampling_time * derivatives[0];
        Ok(self.x)
    }

    fn derivative_count(&self) -> usize {
        1
    }

    fn estimate(&self) -> f64 {
        self.x
    }

    fn reset(&mut self) {
        self.x = self.x0;
    }

    fn reset_to(&mut self, x0: f64) -> Result<()> {
        ensure_finite("initial estimate", x0)?;
        self.x0 = x0;
        self.x = x0;
        Ok(())
    }
}
