//! Periodic perturbation injected into the parameter and used as the
//! demodulation reference.

use crate::error::{ensure_finite, ensure_positive, EsError, Result};

/// Source of the dither signal.
///
/// Implementations are pure functions of their configuration and `t`.
pub trait DitherGenerator {
    /// Zero disables the perturbation; negative values are rejected.
    fn set_amplitude(&mut self, amplitude: f64) -> Result<()>;
    /// Must be > 0, in the units of `t`.
    fn set_frequency(&mut self, frequency: f64) -> Result<()>;
    fn set_phase(&mut self, phase: f64) -> Result<()>;
    /// Dither value at time `t`.
    fn update(&self, t: f64) -> f64;
    fn amplitude(&self) -> f64;
    fn frequency(&self) -> f64;
    fn phase(&self) -> f64;
}

/// `a * sin(w t + phi)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SineDither {
    amplitude: f64,
    frequency: f64,
    phase: f64,
}

impl SineDither {
    /// Create a new sine dither
    pub fn new(amplitude: f64, frequency: f64, phase: f64) -> Result<Self> {
        let mut dither = Self {
            amplitude: 0.0,
            frequency: 1.0,
            phase: 0.0,
        };
        dither.set_amplitude(amplitude)?;
        dither.set_frequency(frequency)?;
        dither.set_phase(phase)?;
        Ok(dither)
    }
}

impl DitherGenerator for SineDither {
    fn set_amplitude(&mut self, amplitude: f64) -> Result<()> {
        if !(amplitude.is_finite() && amplitude >= 0.0) {
            return Err(EsError::InvalidArgument(format!(
                "dither amplitude must be finite and >= 0, got {amplitude}"
            )));
        }
        self.amplitude = amplitude;
        Ok(())
    }

    fn set_frequency(&mut self, frequency: f64) -> Result<()> {
        ensure_positive("dither frequency", frequency)?;
        self.frequency = frequency;
        Ok(())
    }

    fn set_phase(&mut self, phase: f64) -> Result<()> {
        ensure_finite("dither phase", phase)?;
        self.phase = phase;
        Ok(())
    }

    fn update(&self, t: f64) -> f64 {
        self.amplitude * (self.frequency * t + self.phase).sin()
    }

    fn amplitude(&self) -> f64 {
        self.amplitude
    }

    fn frequency(&self) -> f64 {
        self.frequency
    }

    fn phase(&self) -> f64 {
        self.phase
    }
}
