//! Standard gradient extremum seeking.

use tracing::{debug, trace};

use crate::dither::DitherGenerator;
use crate::error::Result;
use crate::estimator::Estimator;
use crate::manager::{check_composition, check_sample, AdaptationManager, AdaptationParameter};
use crate::optimiser::Optimiser;

/// Per tick: `theta = clamp(optimiser(estimator(u, t)) + dither(t))`.
///
/// The optimiser only steps on ticks where the estimator publishes; otherwise
/// the previous raw estimate is held.
///
/// Collaborators can be reconfigured through the `*_mut` accessors before the
/// first update or between resets. The composition is checked again on the
/// next update.
pub struct ExtremumSeeker {
    dither: Box<dyn DitherGenerator>,
    estimator: Box<dyn Estimator>,
    optimiser: Box<dyn Optimiser>,
    parameter: AdaptationParameter,
    checked: bool,
}

impl ExtremumSeeker {
    /// Fails if the estimator's channels or reference do not fit the optimiser and dither.
    pub fn new(
        dither: Box<dyn DitherGenerator>,
        estimator: Box<dyn Estimator>,
        optimiser: Box<dyn Optimiser>,
        theta_min: f64,
        theta_max: f64,
    ) -> Result<Self> {
        check_composition(dither.as_ref(), estimator.as_ref(), optimiser.as_ref())?;
        let parameter = AdaptationParameter::new(optimiser.estimate(), theta_min, theta_max)?;
        debug!(
            theta = parameter.value(),
            theta_min, theta_max, "extremum seeker created"
        );
        Ok(Self {
            dither,
            estimator,
            optimiser,
            parameter,
            checked: true,
        })
    }

    pub fn estimator(&self) -> &dyn Estimator {
        self.estimator.as_ref()
    }

    pub fn optimiser(&self) -> &dyn Optimiser {
        self.optimiser.as_ref()
    }

    pub fn dither(&self) -> &dyn DitherGenerator {
        self.dither.as_ref()
    }

    pub fn estimator_mut(&mut self) -> &mut dyn Estimator {
        self.checked = false;
        self.estimator.as_mut()
    }

    pub fn optimiser_mut(&mut self) -> &mut dyn Optimiser {
        self.checked = false;
        self.optimiser.as_mut()
    }

    /// Changing the dither usually needs [`Self::lock_estimator_to_dither`] as well.
    pub fn dither_mut(&mut self) -> &mut dyn DitherGenerator {
        self.checked = false;
        self.dither.as_mut()
    }

    /// Points the estimator's demodulation reference at the current dither.
    pub fn lock_estimator_to_dither(&mut self) -> Result<()> {
        self.checked = false;
        self.estimator.lock_to(self.dither.as_ref())
    }

    pub fn limits(&self) -> (f64, f64) {
        self.parameter.limits()
    }
}

impl AdaptationManager for ExtremumSeeker {
    fn set_parameter_limits(&mut self, min: f64, max: f64) -> Result<()> {
        self.parameter.set_limits(min, max)?;
        debug!(theta_min = min, theta_max = max, "parameter limits updated");
        Ok(())
    }

    fn update_parameter(&mut self, u: f64, t: f64) -> Result<f64> {
        check_sample(u, t)?;
        if !self.checked {
            check_composition(
                self.dither.as_ref(),
                self.estimator.as_ref(),
                self.optimiser.as_ref(),
            )?;
            self.checked = true;
        }
        if self.estimator.update(u, t) {
            self.optimiser.update(self.estimator.estimates())?;
        }
        let theta_bar = self.optimiser.estimate();
        let theta = self.parameter.assign(theta_bar + self.dither.update(t));
        trace!(u, t, theta_bar, theta, "extremum seeker tick");
        Ok(theta)
    }

    fn parameter(&self) -> f64 {
        self.parameter.value()
    }

    fn theta_bar(&self) -> f64 {
        self.optimiser.estimate()
    }

    fn reset(&mut self) {
        self.estimator.reset();
        self.optimiser.reset();
        self.parameter.assign(self.optimiser.estimate());
        debug!(theta = self.parameter.value(), "extremum seeker reset");
    }
}
