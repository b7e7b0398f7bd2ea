//! Two-channel gradient/Hessian observer for Newton-like extremum seeking.
//!
//! With the parameter dithered as `theta + a sin(wd t + phi)`, a locally
//! quadratic response expands to
//!
//! ```text
//! u ≈ J + a J' sin(wd t + phi) - (a² J'' / 4) cos(2 wd t + 2 phi) + ...
//! ```
//!
//! Channel 0 tracks the mean of `u sin(w0 t + phi)` and channel 1 the mean of
//! `u cos(w1 t + 2 phi)`, each through a first-order lag whose bandwidth is
//! the channel gain. The published estimates undo the demodulation scale:
//! `du = 2 z0 / a` and `d2u = -8 z1 / a²`.

use crate::dither::DitherGenerator;
use crate::error::{ensure_finite, ensure_len, ensure_positive, Result};
use crate::estimator::{smoothing_coefficient, Decimator, Estimator, Reference};

const CHANNELS: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct GradientHessianObserver {
    amplitude: f64,
    phase: f64,
    frequencies: [f64; CHANNELS],
    gains: [f64; CHANNELS],
    sampling_time: f64,
    alphas: [f64; CHANNELS],
    channels: [f64; CHANNELS],
    estimates: [f64; CHANNELS],
    decimator: Decimator,
}

impl GradientHessianObserver {
    /// Channel frequencies and gains are validated as in the setters; `amplitude` must be > 0.
    pub fn new(
        amplitude: f64,
        phase: f64,
        frequencies: [f64; CHANNELS],
        gains: [f64; CHANNELS],
        sampling_time: f64,
    ) -> Result<Self> {
        ensure_positive("dither amplitude", amplitude)?;
        ensure_finite("reference phase", phase)?;
        ensure_positive("sampling time", sampling_time)?;
        let mut observer = Self {
            amplitude,
            phase,
            frequencies: [1.0; CHANNELS],
            gains: [1.0; CHANNELS],
            sampling_time,
            alphas: [0.0; CHANNELS],
            channels: [0.0; CHANNELS],
            estimates: [0.0; CHANNELS],
            decimator: Decimator::new(1)?,
        };
        observer.set_estimator_frequencies(&frequencies)?;
        observer.set_gains(&gains)?;
        Ok(observer)
    }

    /// Observer locked to a dither of frequency `wd`: channels at `wd` and `2 wd`.
    pub fn for_dither(
        amplitude: f64,
        frequency: f64,
        phase: f64,
        gains: [f64; CHANNELS],
        sampling_time: f64,
    ) -> Result<Self> {
        Self::new(
            amplitude,
            phase,
            [frequency, 2.0 * frequency],
            gains,
            sampling_time,
        )
    }

    pub fn with_decimation(mut self, every: usize) -> Result<Self> {
        self.decimator = Decimator::new(every)?;
        Ok(self)
    }

    pub fn frequencies(&self) -> [f64; CHANNELS] {
        self.frequencies
    }

    pub fn gains(&self) -> [f64; CHANNELS] {
        self.gains
    }

    pub fn decimation(&self) -> usize {
        self.decimator.every()
    }

    fn discretize(&mut self) {
        for (alpha, &gain) in self.alphas.iter_mut().zip(self.gains.iter()) {
            *alpha = smoothing_coefficient(gain, self.sampling_time);
        }
    }
}

impl Estimator for GradientHessianObserver {
    fn set_estimator_frequencies(&mut self, frequencies: &[f64]) -> Result<()> {
        ensure_len("observer frequencies", CHANNELS, frequencies.len())?;
        for &w in frequencies {
            ensure_positive("observer frequency", w)?;
        }
        self.frequencies.copy_from_slice(frequencies);
        Ok(())
    }

    fn set_gains(&mut self, gains: &[f64]) -> Result<()> {
        ensure_len("observer gains", CHANNELS, gains.len())?;
        for &l in gains {
            ensure_positive("observer gain", l)?;
        }
        self.gains.copy_from_slice(gains);
        self.discretize();
        Ok(())
    }

    fn set_sampling_time(&mut self, sampling_time: f64) -> Result<()> {
        ensure_positive("sampling time", sampling_time)?;
        self.sampling_time = sampling_time;
        self.discretize();
        Ok(())
    }

    /// Moves both channels to `wd` and `2 wd` and adopts the dither's amplitude and phase.
    fn lock_to(&mut self, dither: &dyn DitherGenerator) -> Result<()> {
        ensure_positive("dither amplitude", dither.amplitude())?;
        ensure_finite("reference phase", dither.phase())?;
        let w = dither.frequency();
        self.set_estimator_frequencies(&[w, 2.0 * w])?;
        self.amplitude = dither.amplitude();
        self.phase = dither.phase();
        Ok(())
    }

    fn reference(&self) -> Reference {
        Reference {
            frequency: self.frequencies[0],
            phase: self.phase,
            amplitude: Some(self.amplitude),
        }
    }

    fn update(&mut self, u: f64, t: f64) -> bool {
        let first = (self.frequencies[0] * t + self.phase).sin();
        let second = (self.frequencies[1] * t + 2.0 * self.phase).cos();
        self.channels[0] += self.alphas[0] * (u * first - self.channels[0]);
        self.channels[1] += self.alphas[1] * (u * second - self.channels[1]);
        if !self.decimator.tick() {
            return false;
        }
        let a = self.amplitude;
        self.estimates[0] = 2.0 * self.channels[0] / a;
        self.estimates[1] = -8.0 * self.channels[1] / (a * a);
        true
    }

    fn estimate(&self, channel: usize) -> Option<f64> {
        self.estimates.get(channel).copied()
    }

    fn estimates(&self) -> &[f64] {
        &self.estimates
    }

    fn states_number(&self) -> usize {
        CHANNELS
    }

    fn reset(&mut self) {
        self.channels = [0.0; CHANNELS];
        self.estimates = [0.0; CHANNELS];
        self.decimator.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dither::SineDither;
    use crate::error::EsError;

    fn run(observer: &mut GradientHessianObserver, phase: f64, steps: usize) {
        let (a, wd) = (0.5, 0.2);
        for i in 0..steps {
            let t = i as f64;
            let d = a * (wd * t + phase).sin();
            // J = 1 + 2 e - 2 e^2: J' = 2, J'' = -4
            let u = 1.0 + 2.0 * d - 2.0 * d * d;
            observer.update(u, t);
        }
    }

    #[test]
    fn test_recovers_gradient_and_hessian() {
        let mut observer =
            GradientHessianObserver::for_dither(0.5, 0.2, 0.0, [0.1, 0.1], 0.01).unwrap();
        run(&mut observer, 0.0, 20_000);
        let du = observer.estimate(0).unwrap();
        let d2u = observer.estimate(1).unwrap();
        assert!((du - 2.0).abs() < 0.05, "du = {du}");
        assert!((d2u + 4.0).abs() < 0.1, "d2u = {d2u}");
    }

    #[test]
    fn test_phase_is_tracked() {
        let mut observer =
            GradientHessianObserver::for_dither(0.5, 0.2, 0.3, [0.1, 0.1], 0.01).unwrap();
        run(&mut observer, 0.3, 20_000);
        let est = observer.estimates();
        assert!((est[0] - 2.0).abs() < 0.05);
        assert!((est[1] + 4.0).abs() < 0.1);
    }

    #[test]
    fn test_channel_layout() {
        let observer =
            GradientHessianObserver::for_dither(0.1, 1.5, 0.0, [1.0, 2.0], 0.01).unwrap();
        assert_eq!(observer.frequencies(), [1.5, 3.0]);
        assert_eq!(observer.gains(), [1.0, 2.0]);
        assert_eq!(observer.states_number(), 2);
        assert_eq!(observer.estimates().len(), 2);
        assert_eq!(observer.estimate(2), None);
        assert_eq!(observer.decimation(), 1);
    }

    #[test]
    fn test_array_lengths_validated() {
        let mut observer =
            GradientHessianObserver::for_dither(0.1, 1.0, 0.0, [1.0, 1.0], 0.01).unwrap();
        assert!(matches!(
            observer.set_estimator_frequencies(&[1.0]),
            Err(EsError::LengthMismatch { expected: 2, got: 1, .. })
        ));
        assert!(matches!(
            observer.set_gains(&[1.0, 1.0, 1.0]),
            Err(EsError::LengthMismatch { expected: 2, got: 3, .. })
        ));
        assert!(observer.set_gains(&[1.0, 0.0]).is_err());
        assert_eq!(observer.gains(), [1.0, 1.0]);
    }

    #[test]
    fn test_zero_amplitude_rejected() {
        assert!(GradientHessianObserver::for_dither(0.0, 1.0, 0.0, [1.0, 1.0], 0.01).is_err());
    }

    #[test]
    fn test_reset() {
        let mut observer =
            GradientHessianObserver::for_dither(0.5, 0.2, 0.0, [0.5, 0.5], 0.01).unwrap();
        run(&mut observer, 0.0, 300);
        let before = observer.estimates().to_vec();
        observer.reset();
        assert_eq!(observer.estimates(), &[0.0, 0.0]);
        run(&mut observer, 0.0, 300);
        assert_eq!(observer.estimates(), before.as_slice());
    }

    #[test]
    fn test_lock_to_follows_dither() {
        let mut observer =
            GradientHessianObserver::for_dither(0.5, 0.2, 0.0, [0.5, 0.5], 0.01).unwrap();
        let dither = SineDither::new(0.25, 0.3, 0.1).unwrap();
        observer.lock_to(&dither).unwrap();
        assert_eq!(observer.frequencies(), [0.3, 0.6]);
        assert!(observer.reference().matches(&dither));

        let silent = SineDither::new(0.0, 0.3, 0.1).unwrap();
        assert!(observer.lock_to(&silent).is_err());
        assert_eq!(observer.reference().amplitude, Some(0.25));
    }
}
