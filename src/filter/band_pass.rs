//! Second-order band-pass ("Q") filter with externally computed coefficients.

use crate::error::{ensure_finite, ensure_positive, Result};
use crate::filter::Filter;

/// `y = -b1 y[n-1] - b2 y[n-2] + g (u - u[n-1])`.
///
/// The coefficients are supplied pre-computed. The cutoff and sampling time
/// are stored for reference only and never re-derive `b1`/`b2`, so callers
/// can keep feeding coefficients designed elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub struct BandPassFilter {
    gain: f64,
    b1: f64,
    b2: f64,
    cutoff: Option<f64>,
    sampling_time: Option<f64>,
    x1: f64,
    x2: f64,
    u_prev: f64,
}

impl BandPassFilter {
    /// Create a new band-pass filter from pre-computed coefficients
    pub fn new(gain: f64, b1: f64, b2: f64) -> Result<Self> {
        ensure_finite("band-pass gain", gain)?;
        ensure_finite("band-pass b1", b1)?;
        ensure_finite("band-pass b2", b2)?;
        Ok(Self {
            gain,
            b1,
            b2,
            cutoff: None,
            sampling_time: None,
            x1: 0.0,
            x2: 0.0,
            u_prev: 0.0,
        })
    }

    pub fn coefficients(&self) -> (f64, f64, f64) {
        (self.gain, self.b1, self.b2)
    }

    pub fn cutoff(&self) -> Option<f64> {
        self.cutoff
    }

    pub fn sampling_time(&self) -> Option<f64> {
        self.sampling_time
    }
}

impl Filter for BandPassFilter {
    /// Recorded only; `b1`/`b2` are not re-derived.
    fn set_cutoff_frequency(&mut self, cutoff: f64) -> Result<()> {
        ensure_positive("cutoff frequency", cutoff)?;
        self.cutoff = Some(cutoff);
        Ok(())
    }

    fn set_gain(&mut self, gain: f64) -> Result<()> {
        ensure_finite("band-pass gain", gain)?;
        self.gain = gain;
        Ok(())
    }

    /// Recorded only, like the cutoff.
    fn set_sampling_time(&mut self, sampling_time: f64) -> Result<()> {
        ensure_positive("sampling time", sampling_time)?;
        self.sampling_time = Some(sampling_time);
        Ok(())
    }

    fn update(&mut self, u: f64) -> f64 {
        let y = -self.b1 * self.x1 - self.b2 * self.x2 + self.gain * (u - self.u_prev);
        self.x2 = self.x1;
        self.x1 = y;
        self.u_prev = u;
        y
    }

    fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.u_prev = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recursion_by_hand() {
        let mut q = BandPassFilter::new(0.5, -1.0, 0.25).unwrap();
        // y0 = 0.5 * (1 - 0)
        assert_eq!(q.update(1.0), 0.5);
        // y1 = 1.0 * 0.5 - 0.25 * 0 + 0.5 * (1 - 1)
        assert_eq!(q.update(1.0), 0.5);
        // y2 = 0.5 - 0.125 + 0.5 * (0 - 1)
        assert_eq!(q.update(0.0), -0.125);
    }

    #[test]
    fn test_setters_do_not_touch_coefficients() {
        let mut q = BandPassFilter::new(0.5, -1.2, 0.4).unwrap();
        q.set_cutoff_frequency(3.0).unwrap();
        q.set_sampling_time(0.01).unwrap();
        assert_eq!(q.coefficients(), (0.5, -1.2, 0.4));
        assert_eq!(q.cutoff(), Some(3.0));
        assert!(q.set_sampling_time(0.0).is_err());
        assert_eq!(q.sampling_time(), Some(0.01));
    }

    #[test]
    fn test_reset() {
        let mut q = BandPassFilter::new(1.0, -0.5, 0.1).unwrap();
        let first = q.update(2.0);
        q.update(-1.0);
        q.update(4.0);
        q.reset();
        assert_eq!(q.update(2.0), first);
    }
}
