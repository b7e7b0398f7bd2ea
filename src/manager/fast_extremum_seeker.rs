//! Newton-accelerated (fast) extremum seeking.

use tracing::{debug, trace};

use crate::dither::DitherGenerator;
use crate::error::Result;
use crate::estimator::Estimator;
use crate::filter::Filter;
use crate::manager::{check_composition, check_sample, AdaptationManager, AdaptationParameter};
use crate::optimiser::Optimiser;

/// Per tick: `uf = filter(u)`, derivatives from `estimator(uf, t)`, then
/// `theta = clamp(optimiser(derivatives) + dither(t))`.
///
/// Every tick records `[uf, du, (d2u), theta_bar]` for the host's
/// experiment log; see [`FastExtremumSeeker::states`]. Reconfiguration
/// through the `*_mut` accessors is re-checked on the next update.
pub struct FastExtremumSeeker {
    dither: Box<dyn DitherGenerator>,
    filter: Box<dyn Filter>,
    estimator: Box<dyn Estimator>,
    optimiser: Box<dyn Optimiser>,
    parameter: AdaptationParameter,
    states: Vec<f64>,
    checked: bool,
}

impl FastExtremumSeeker {
    /// Fails if the estimator's channels or reference do not fit the optimiser and dither.
    pub fn new(
        dither: Box<dyn DitherGenerator>,
        filter: Box<dyn Filter>,
        estimator: Box<dyn Estimator>,
        optimiser: Box<dyn Optimiser>,
        theta_min: f64,
        theta_max: f64,
    ) -> Result<Self> {
        check_composition(dither.as_ref(), estimator.as_ref(), optimiser.as_ref())?;
        let parameter = AdaptationParameter::new(optimiser.estimate(), theta_min, theta_max)?;
        let states = vec![0.0; estimator.states_number() + 2];
        debug!(
            theta = parameter.value(),
            theta_min,
            theta_max,
            channels = estimator.states_number(),
            "fast extremum seeker created"
        );
        Ok(Self {
            dither,
            filter,
            estimator,
            optimiser,
            parameter,
            states,
            checked: true,
        })
    }

    /// `[uf, du, (d2u), theta_bar]` from the last tick; zeros before the first.
    pub fn states(&self) -> &[f64] {
        &self.states
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

    pub fn filter(&self) -> &dyn Filter {
        self.filter.as_ref()
    }

    pub fn limits(&self) -> (f64, f64) {
        self.parameter.limits()
    }

    /// The state record length is fixed at construction, so the channel count must not change.
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

    pub fn filter_mut(&mut self) -> &mut dyn Filter {
        self.filter.as_mut()
    }

    /// Points the estimator's demodulation reference at the current dither.
    pub fn lock_estimator_to_dither(&mut self) -> Result<()> {
        self.checked = false;
        self.estimator.lock_to(self.dither.as_ref())
    }

    fn record(&mut self, uf: f64, theta_bar: f64) {
        self.states.clear();
        self.states.push(uf);
        self.states.extend_from_slice(self.estimator.estimates());
        self.states.push(theta_bar);
    }
}

impl AdaptationManager for FastExtremumSeeker {
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
        let uf = self.filter.update(u);
        if self.estimator.update(uf, t) {
            self.optimiser.update(self.estimator.estimates())?;
        }
        let theta_bar = self.optimiser.estimate();
        let theta = self.parameter.assign(theta_bar + self.dither.update(t));
        self.record(uf, theta_bar);
        trace!(u, uf, t, theta_bar, theta, "fast extremum seeker tick");
        Ok(theta)
    }

    fn parameter(&self) -> f64 {
        self.parameter.value()
    }

    fn theta_bar(&self) -> f64 {
        self.optimiser.estimate()
    }

    fn reset(&mut self) {
        self.filter.reset();
        self.estimator.reset();
        self.optimiser.reset();
        self.parameter.assign(self.optimiser.estimate());
        self.states.fill(0.0);
        debug!(theta = self.parameter.value(), "fast extremum seeker reset");
    }

    fn diagnostics(&self) -> &[f64] {
        &self.states
    }
}
