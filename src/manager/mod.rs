//! Adaptation managers: composition roots that own one dither generator,
//! estimator, optimiser and (for FES) pre-filter, and turn each `(u, t)`
//! sample into a bounded parameter value.

use crate::dither::DitherGenerator;
use crate::error::{ensure_finite, EsError, Result};
use crate::estimator::Estimator;
use crate::optimiser::Optimiser;

pub mod extremum_seeker;
pub mod fast_extremum_seeker;

pub use extremum_seeker::ExtremumSeeker;
pub use fast_extremum_seeker::FastExtremumSeeker;

/// Contract the host control loop drives once per tick.
pub trait AdaptationManager {
    /// Sets `[min, max]` and re-clamps the current parameter.
    fn set_parameter_limits(&mut self, min: f64, max: f64) -> Result<()>;
    /// Consumes one measurement and returns the new parameter, always inside the limits.
    fn update_parameter(&mut self, u: f64, t: f64) -> Result<f64>;
    fn parameter(&self) -> f64;
    /// Raw optimiser estimate, before dither and clamping.
    fn theta_bar(&self) -> f64;
    /// Zeroes collaborator memory and restores the initial parameter; configuration is kept.
    fn reset(&mut self);
    /// Internal states recorded on the last tick.
    fn diagnostics(&self) -> &[f64] {
        &[]
    }
}

/// Bounded scalar parameter owned by a manager.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptationParameter {
    theta: f64,
    min: f64,
    max: f64,
}

impl AdaptationParameter {
    /// `theta` is clamped into `[min, max]`.
    pub fn new(theta: f64, min: f64, max: f64) -> Result<Self> {
        validate_limits(min, max)?;
        ensure_finite("theta", theta)?;
        Ok(Self {
            theta: theta.clamp(min, max),
            min,
            max,
        })
    }

    pub fn set_limits(&mut self, min: f64, max: f64) -> Result<()> {
        validate_limits(min, max)?;
        self.min = min;
        self.max = max;
        self.theta = self.theta.clamp(min, max);
        Ok(())
    }

    /// Stores `value` clamped to the limits and returns it.
    pub fn assign(&mut self, value: f64) -> f64 {
        self.theta = value.clamp(self.min, self.max);
        self.theta
    }

    pub fn value(&self) -> f64 {
        self.theta
    }

    pub fn limits(&self) -> (f64, f64) {
        (self.min, self.max)
    }
}

fn validate_limits(min: f64, max: f64) -> Result<()> {
    ensure_finite("theta_min", min)?;
    ensure_finite("theta_max", max)?;
    if min > max {
        return Err(EsError::InvalidArgument(format!(
            "theta_min ({min}) must not exceed theta_max ({max})"
        )));
    }
    Ok(())
}

fn check_composition(
    dither: &dyn DitherGenerator,
    estimator: &dyn Estimator,
    optimiser: &dyn Optimiser,
) -> Result<()> {
    let channels = estimator.states_number();
    let expected = optimiser.derivative_count();
    if channels != expected {
        return Err(EsError::InvalidArgument(format!(
            "estimator publishes {channels} derivative(s) but optimiser expects {expected}"
        )));
    }
    let reference = estimator.reference();
    if !reference.matches(dither) {
        return Err(EsError::InvalidArgument(format!(
            "estimator reference {reference:?} does not match dither \
             (amplitude {}, frequency {}, phase {})",
            dither.amplitude(),
            dither.frequency(),
            dither.phase()
        )));
    }
    Ok(())
}

fn check_sample(u: f64, t: f64) -> Result<()> {
    ensure_finite("measurement u", u)?;
    ensure_finite("time t", t)
}
