//! First-order digital filters discretised with a zero-order hold.
//!
//! The continuous time constant is `RC = 1 / wo`. Each response computes its
//! recursion coefficient `alpha` whenever the cutoff or sampling time changes,
//! and rounds its output to two decimals.

use std::marker::PhantomData;

use crate::error::{ensure_finite, ensure_positive, Result};
use crate::filter::{round2, Filter};

/// Recursion of a first-order response.
pub trait Response {
    fn alpha(rc: f64, sampling_time: f64) -> f64;
    fn output(alpha: f64, gain: f64, u: f64, u_prev: f64, x_prev: f64) -> f64;
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LowPass;

impl Response for LowPass {
    fn alpha(rc: f64, sampling_time: f64) -> f64 {
        sampling_time / (rc + sampling_time)
    }

    fn output(alpha: f64, gain: f64, u: f64, _u_prev: f64, x_prev: f64) -> f64 {
        alpha * u + gain * (1.0 - alpha) * x_prev
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HighPass;

impl Response for HighPass {
    fn alpha(rc: f64, sampling_time: f64) -> f64 {
        rc / (rc + sampling_time)
    }

    fn output(alpha: f64, gain: f64, u: f64, u_prev: f64, x_prev: f64) -> f64 {
        alpha * x_prev + gain * (u - u_prev)
    }
}

/// First-order filter with response `R`.
#[derive(Debug, Clone, PartialEq)]
pub struct FirstOrderFilter<R> {
    cutoff: f64,
    gain: f64,
    sampling_time: f64,
    alpha: f64,
    x_prev: f64,
    u_prev: f64,
    response: PhantomData<R>,
}

pub type LowPassFilter = FirstOrderFilter<LowPass>;
pub type HighPassFilter = FirstOrderFilter<HighPass>;

impl<R: Response> FirstOrderFilter<R> {
    /// Create a new first-order filter; `cutoff` and `sampling_time` must be > 0
    pub fn new(cutoff: f64, gain: f64, sampling_time: f64) -> Result<Self> {
        ensure_positive("cutoff frequency", cutoff)?;
        ensure_finite("filter gain", gain)?;
        ensure_positive("sampling time", sampling_time)?;
        let mut filter = Self {
            cutoff,
            gain,
            sampling_time,
            alpha: 0.0,
            x_prev: 0.0,
            u_prev: 0.0,
            response: PhantomData,
        };
        filter.discretize();
        Ok(filter)
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn sampling_time(&self) -> f64 {
        self.sampling_time
    }

    fn discretize(&mut self) {
        let rc = 1.0 / self.cutoff;
        self.alpha = R::alpha(rc, self.sampling_time);
    }
}

impl<R: Response> Filter for FirstOrderFilter<R> {
    fn set_cutoff_frequency(&mut self, cutoff: f64) -> Result<()> {
        ensure_positive("cutoff frequency", cutoff)?;
        self.cutoff = cutoff;
        self.discretize();
        Ok(())
    }

    fn set_gain(&mut self, gain: f64) -> Result<()> {
        ensure_finite("filter gain", gain)?;
        self.gain = gain;
        Ok(())
    }

    fn set_sampling_time(&mut self, sampling_time: f64) -> Result<()> {
        ensure_positive("sampling time", sampling_time)?;
        self.sampling_time = sampling_time;
        self.discretize();
        Ok(())
    }

    fn update(&mut self, u: f64) -> f64 {
        let y = round2(R::output(self.alpha, self.gain, u, self.u_prev, self.x_prev));
        self.u_prev = u;
        self.x_prev = y;
        y
    }

    fn reset(&mut self) {
        self.x_prev = 0.0;
        self.u_prev = 0.0;
    }
}
