//! General N-th order SISO state-space filter.

use crate::error::{ensure_finite, ensure_positive, EsError, Result};
use crate::filter::Filter;
use crate::linalg::{self, Matrix, Vector};

/// `y = C·x + D u`, then `x = A x + B u`.
///
/// The output uses the state from before the update. The configuration is
/// baked into `A, B, C, D`, so the cutoff, gain and sampling-time setters
/// validate their argument and otherwise have no effect.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSpaceFilter {
    a: Matrix,
    b: Vector,
    c: Vector,
    d: f64,
    x: Vector,
    next: Vector,
}

impl StateSpaceFilter {
    /// Checks `A: n×n`, `B, C: n` with `n >= 1`; the state starts at zero.
    pub fn new(a: Matrix, b: Vector, c: Vector, d: f64) -> Result<Self> {
        let n = linalg::check_state_space(&a, &b, &c)?;
        if n == 0 {
            return Err(EsError::InvalidArgument(
                "state-space model needs at least one state".to_string(),
            ));
        }
        ensure_finite("state-space D", d)?;
        Ok(Self {
            a,
            b,
            c,
            d,
            x: Vector::zeros(n),
            next: Vector::zeros(n),
        })
    }

    pub fn order(&self) -> usize {
        self.x.len()
    }

    pub fn state(&self) -> &Vector {
        &self.x
    }
}

impl Filter for StateSpaceFilter {
    /// Validated, then ignored.
    fn set_cutoff_frequency(&mut self, cutoff: f64) -> Result<()> {
        ensure_positive("cutoff frequency", cutoff)
    }

    /// Validated, then ignored; `D` already carries the feed-through gain.
    fn set_gain(&mut self, gain: f64) -> Result<()> {
        ensure_finite("filter gain", gain)
    }

    /// Validated, then ignored.
    fn set_sampling_time(&mut self, sampling_time: f64) -> Result<()> {
        ensure_positive("sampling time", sampling_time)
    }

    fn update(&mut self, u: f64) -> f64 {
        let y = self.c.dot(&self.x) + self.d * u;
        linalg::affine_step_into(&mut self.next, &self.a, &self.x, &self.b, u);
        std::mem::swap(&mut self.x, &mut self.next);
        y
    }

    fn reset(&mut self) {
        self.x.fill(0.0);
        self.next.fill(0.0);
    }
}
