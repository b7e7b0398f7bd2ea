//! Switching gradient/Newton (SGN) optimiser.

use tracing::debug;

use crate::error::{ensure_finite, ensure_len, ensure_positive, Result};
use crate::optimiser::Optimiser;

/// Branch taken by the last [`SwitchingOptimiser`] update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Gradient,
    Newton,
}

/// Consumes `[du, d2u]` and steps
///
/// ```text
/// x -= k wo du / d2u   if |du| < -epsilon d2u   (Newton)
/// x += k wo du         otherwise                (gradient)
/// ```
///
/// `wo` is the dither frequency used as the step rate; the trait's
/// `set_sampling_time` sets it. The Newton branch is only entered with a
/// strictly negative curvature estimate, so a positive gain seeks a maximum.
/// There is no guard against a curvature estimate that is negative but tiny.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchingOptimiser {
    gain: f64,
    dither_frequency: f64,
    epsilon: f64,
    x0: f64,
    x: f64,
    last_step: Option<Step>,
}

impl SwitchingOptimiser {
    /// `dither_frequency` and `epsilon` must be > 0.
    pub fn new(gain: f64, dither_frequency: f64, epsilon: f64, x0: f64) -> Result<Self> {
        ensure_finite("optimiser gain", gain)?;
        ensure_positive("dither frequency", dither_frequency)?;
        ensure_positive("switching threshold", epsilon)?;
        ensure_finite("initial estimate", x0)?;
        Ok(Self {
            gain,
            dither_frequency,
            epsilon,
            x0,
            x: x0,
            last_step: None,
        })
    }

    pub fn set_dither_frequency(&mut self, dither_frequency: f64) -> Result<()> {
        ensure_positive("dither frequency", dither_frequency)?;
        self.dither_frequency = dither_frequency;
        Ok(())
    }

    pub fn set_epsilon(&mut self, epsilon: f64) -> Result<()> {
        ensure_positive("switching threshold", epsilon)?;
        self.epsilon = epsilon;
        Ok(())
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn dither_frequency(&self) -> f64 {
        self.dither_frequency
    }

    /// `None` until the first update.
    pub fn last_step(&self) -> Option<Step> {
        self.last_step
    }
}

impl Optimiser for SwitchingOptimiser {
    fn set_gain(&mut self, gain: f64) -> Result<()> {
        ensure_finite("optimiser gain", gain)?;
        self.gain = gain;
        Ok(())
    }

    /// Sets the dither frequency used as the step rate.
    fn set_sampling_time(&mut self, sampling_time: f64) -> Result<()> {
        self.set_dither_frequency(sampling_time)
    }

    fn update(&mut self, derivatives: &[f64]) -> Result<f64> {
        ensure_len("derivative vector", 2, derivatives.len())?;
        let (du, d2u) = (derivatives[0], derivatives[1]);
        let rate = self.gain * self.dither_frequency;

        let step = if du.abs() < -self.epsilon * d2u {
            self.x -= rate * du / d2u;
            Step::Newton
        } else {
            self.x += rate * du;
            Step::Gradient
        };

        if self.last_step != Some(step) {
            debug!(?step, du, d2u, x = self.x, "switching optimiser changed branch");
            self.last_step = Some(step);
        }
        Ok(self.x)
    }

    fn derivative_count(&self) -> usize {
        2
    }

    fn estimate(&self) -> f64 {
        self.x
    }

    fn reset(&mut self) {
        self.x = self.x0;
        self.last_step = None;
    }

    fn reset_to(&mut self, x0: f64) -> Result<()> {
        ensure_finite("initial estimate", x0)?;
        self.x0 = x0;
        self.reset();
        Ok(())
    }
}
