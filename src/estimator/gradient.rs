//! Gradient estimator for standard extremum seeking.

use crate::dither::DitherGenerator;
use crate::error::{ensure_finite, ensure_len, ensure_positive, Result};
use crate::estimator::{smoothing_coefficient, Decimator, Estimator, Reference};

/// Synchronous demodulator: `du = L * LowPass_wo(u * sin(wd t + phi))`.
///
/// The low-pass cutoff `wo` must sit well below the dither frequency `wd` so
/// that the product averages down to the gradient term. The gain `L` absorbs
/// the `a / 2` demodulation scale.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientEstimator {
    reference_frequency: f64,
    phase: f64,
    cutoff: f64,
    gain: f64,
    sampling_time: f64,
    alpha: f64,
    demodulated: f64,
    estimates: [f64; 1],
    decimator: Decimator,
}

impl GradientEstimator {
    /// Demodulates against `sin(reference_frequency t + phase)` through a
    /// low-pass of bandwidth `cutoff` and scales by `gain`.
    pub fn new(
        reference_frequency: f64,
        phase: f64,
        cutoff: f64,
        gain: f64,
        sampling_time: f64,
    ) -> Result<Self> {
        ensure_positive("reference frequency", reference_frequency)?;
        ensure_finite("reference phase", phase)?;
        ensure_positive("estimator frequency", cutoff)?;
        ensure_finite("estimator gain", gain)?;
        ensure_positive("sampling time", sampling_time)?;
        Ok(Self {
            reference_frequency,
            phase,
            cutoff,
            gain,
            sampling_time,
            alpha: smoothing_coefficient(cutoff, sampling_time),
            demodulated: 0.0,
            estimates: [0.0],
            decimator: Decimator::new(1)?,
        })
    }

    /// Publishes a new estimate only every `every` ticks.
    pub fn with_decimation(mut self, every: usize) -> Result<Self> {
        self.decimator = Decimator::new(every)?;
        Ok(self)
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    pub fn decimation(&self) -> usize {
        self.decimator.every()
    }
}

impl Estimator for GradientEstimator {
    fn set_estimator_frequencies(&mut self, frequencies: &[f64]) -> Result<()> {
        ensure_len("estimator frequencies", 1, frequencies.len())?;
        ensure_positive("estimator frequency", frequencies[0])?;
        self.cutoff = frequencies[0];
        self.alpha = smoothing_coefficient(self.cutoff, self.sampling_time);
        Ok(())
    }

    fn set_gains(&mut self, gains: &[f64]) -> Result<()> {
        ensure_len("estimator gains", 1, gains.len())?;
        ensure_finite("estimator gain", gains[0])?;
        self.gain = gains[0];
        Ok(())
    }

    fn set_sampling_time(&mut self, sampling_time: f64) -> Result<()> {
        ensure_positive("sampling time", sampling_time)?;
        self.sampling_time = sampling_time;
        self.alpha = smoothing_coefficient(self.cutoff, self.sampling_time);
        Ok(())
    }

    fn lock_to(&mut self, dither: &dyn DitherGenerator) -> Result<()> {
        ensure_positive("reference frequency", dither.frequency())?;
        ensure_finite("reference phase", dither.phase())?;
        self.reference_frequency = dither.frequency();
        self.phase = dither.phase();
        Ok(())
    }

    fn reference(&self) -> Reference {
        Reference {
            frequency: self.reference_frequency,
            phase: self.phase,
            amplitude: None,
        }
    }

    fn update(&mut self, u: f64, t: f64) -> bool {
        let reference = (self.reference_frequency * t + self.phase).sin();
        self.demodulated += self.alpha * (u * reference - self.demodulated);
        if !self.decimator.tick() {
            return false;
        }
        self.estimates[0] = self.gain * self.demodulated;
        true
    }

    fn estimate(&self, channel: usize) -> Option<f64> {
        self.estimates.get(channel).copied()
    }

    fn estimates(&self) -> &[f64] {
        &self.estimates
    }

    fn states_number(&self) -> usize {
        self.estimates.len()
    }

    fn reset(&mut self) {
        self.demodulated = 0.0;
        self.estimates = [0.0];
        self.decimator.reset();
    }
}
