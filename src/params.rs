//! Parameter records for building adaptation managers.
//!
//! Defaults reproduce the reference scenarios: a slow gradient seeker
//! descending a quadratic cost, and a Newton-accelerated seeker climbing a
//! concave performance signal.

use serde::{Deserialize, Serialize};

use crate::dither::SineDither;
use crate::error::Result;
use crate::estimator::{GradientEstimator, GradientHessianObserver};
use crate::filter::{
    BandPassFilter, Filter, HighPassFilter, LowPassFilter, MovingAverageFilter, StateSpaceFilter,
};
use crate::linalg::{self, Vector};
use crate::manager::{ExtremumSeeker, FastExtremumSeeker};
use crate::optimiser::{GradientOptimiser, SwitchingOptimiser};

/// Dither `amplitude * sin(frequency * t + phase)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DitherParams {
    pub amplitude: f64,
    /// Units of `t` (rad/s or rad/iteration)
    pub frequency: f64,
    pub phase: f64,
}

impl DitherParams {
    pub fn build(&self) -> Result<SineDither> {
        SineDither::new(self.amplitude, self.frequency, self.phase)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LimitParams {
    pub min: f64,
    pub max: f64,
}

impl Default for LimitParams {
    fn default() -> Self {
        Self {
            min: -10.0,
            max: 10.0,
        }
    }
}

/// Standard extremum seeker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EsParams {
    pub dither: DitherParams,
    /// Demodulation low-pass cutoff `wo`, well below the dither frequency
    pub cutoff: f64,
    /// Estimator gain `L`
    pub gain: f64,
    pub sampling_time: f64,
    /// Optimiser gain `k`; negative descends the measured signal
    pub optimiser_gain: f64,
    pub theta0: f64,
    pub limits: LimitParams,
    /// Publish a gradient estimate every `decimation` ticks
    pub decimation: usize,
}

impl Default for EsParams {
    fn default() -> Self {
        Self {
            dither: DitherParams {
                amplitude: 0.1,
                frequency: 1.0,
                phase: 0.0,
            },
            cutoff: 0.1,
            gain: 1.0,
            sampling_time: 0.01,
            optimiser_gain: -1.0,
            theta0: 0.0,
            limits: LimitParams::default(),
            decimation: 1,
        }
    }
}

impl EsParams {
    pub fn validate(&self) -> Result<()> {
        self.build().map(|_| ())
    }

    pub fn build(&self) -> Result<ExtremumSeeker> {
        let dither = self.dither.build()?;
        let estimator = GradientEstimator::new(
            self.dither.frequency,
            self.dither.phase,
            self.cutoff,
            self.gain,
            self.sampling_time,
        )?
        .with_decimation(self.decimation)?;
        let optimiser =
            GradientOptimiser::new(self.optimiser_gain, self.sampling_time, self.theta0)?;
        ExtremumSeeker::new(
            Box::new(dither),
            Box::new(estimator),
            Box::new(optimiser),
            self.limits.min,
            self.limits.max,
        )
    }
}

/// Pre-filter applied to the measurement before estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PrefilterParams {
    LowPass {
        cutoff: f64,
        gain: f64,
        sampling_time: f64,
    },
    HighPass {
        cutoff: f64,
        gain: f64,
        sampling_time: f64,
    },
    BandPass {
        gain: f64,
        b1: f64,
        b2: f64,
    },
    MovingAverage {
        window: usize,
    },
    StateSpace {
        /// Row-major
        a: Vec<Vec<f64>>,
        b: Vec<f64>,
        c: Vec<f64>,
        d: f64,
    },
}

impl PrefilterParams {
    pub fn build(&self) -> Result<Box<dyn Filter>> {
        let filter: Box<dyn Filter> = match self {
            Self::LowPass {
                cutoff,
                gain,
                sampling_time,
            } => Box::new(LowPassFilter::new(*cutoff, *gain, *sampling_time)?),
            Self::HighPass {
                cutoff,
                gain,
                sampling_time,
            } => Box::new(HighPassFilter::new(*cutoff, *gain, *sampling_time)?),
            Self::BandPass { gain, b1, b2 } => Box::new(BandPassFilter::new(*gain, *b1, *b2)?),
            Self::MovingAverage { window } => Box::new(MovingAverageFilter::new(*window)?),
            Self::StateSpace { a, b, c, d } => Box::new(StateSpaceFilter::new(
                linalg::matrix_from_rows(a)?,
                Vector::from_column_slice(b),
                Vector::from_column_slice(c),
                *d,
            )?),
        };
        Ok(filter)
    }
}

/// Newton-accelerated extremum seeker.
///
/// The switching optimiser only takes Newton steps on negative curvature, so
/// the defaults climb the measured signal (`optimiser_gain > 0`). Feed a
/// negated cost to minimise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FesParams {
    pub dither: DitherParams,
    pub prefilter: PrefilterParams,
    /// Bandwidths of the gradient and Hessian channels
    pub observer_gains: [f64; 2],
    pub sampling_time: f64,
    pub optimiser_gain: f64,
    /// Newton/gradient switching threshold
    pub epsilon: f64,
    pub theta0: f64,
    pub limits: LimitParams,
    pub decimation: usize,
}

impl Default for FesParams {
    fn default() -> Self {
        Self {
            dither: DitherParams {
                amplitude: 0.5,
                frequency: 0.2,
                phase: 0.0,
            },
            prefilter: PrefilterParams::HighPass {
                cutoff: 10.0,
                gain: 1.0,
                sampling_time: 0.01,
            },
            observer_gains: [0.5, 0.5],
            sampling_time: 0.01,
            optimiser_gain: 0.005,
            epsilon: 1.0,
            theta0: 0.0,
            limits: LimitParams::default(),
            decimation: 1,
        }
    }
}

impl FesParams {
    pub fn validate(&self) -> Result<()> {
        self.build().map(|_| ())
    }

    pub fn build(&self) -> Result<FastExtremumSeeker> {
        let dither = self.dither.build()?;
        let filter = self.prefilter.build()?;
        let observer = GradientHessianObserver::for_dither(
            self.dither.amplitude,
            self.dither.frequency,
            self.dither.phase,
            self.observer_gains,
            self.sampling_time,
        )?
        .with_decimation(self.decimation)?;
        let optimiser = SwitchingOptimiser::new(
            self.optimiser_gain,
            self.dither.frequency,
            self.epsilon,
            self.theta0,
        )?;
        FastExtremumSeeker::new(
            Box::new(dither),
            filter,
            Box::new(observer),
            Box::new(optimiser),
            self.limits.min,
            self.limits.max,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EsError;
    use crate::manager::AdaptationManager;

    #[test]
    fn test_defaults_build() {
        let es = EsParams::default().build().unwrap();
        assert_eq!(es.parameter(), 0.0);
        assert_eq!(es.limits(), (-10.0, 10.0));
        let fes = FesParams::default().build().unwrap();
        assert_eq!(fes.states().len(), 4);
    }

    #[test]
    fn test_invalid_values_surface() {
        let mut params = EsParams::default();
        params.sampling_time = 0.0;
        assert!(matches!(params.validate(), Err(EsError::InvalidArgument(_))));

        let mut params = FesParams::default();
        params.epsilon = 0.0;
        assert!(params.validate().is_err());

        let mut params = FesParams::default();
        params.prefilter = PrefilterParams::MovingAverage { window: 0 };
        assert!(params.validate().is_err());

        let mut params = EsParams::default();
        params.limits = LimitParams { min: 1.0, max: 0.0 };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_state_space_prefilter_shapes_checked() {
        let bad = PrefilterParams::StateSpace {
            a: vec![vec![0.0, 1.0]],
            b: vec![1.0],
            c: vec![1.0],
            d: 0.0,
        };
        assert!(matches!(
            bad.build(),
            Err(EsError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_toml_round_trip_of_prefilter_kind() {
        let raw = r#"
            sampling_time = 0.02
            observer_gains = [0.2, 0.3]

            [dither]
            amplitude = 0.4
            frequency = 0.25
            phase = 0.0

            [prefilter]
            kind = "state_space"
            a = [[0.0]]
            b = [1.0]
            c = [0.0]
            d = 1.0
        "#;
        let params: FesParams = toml::from_str(raw).unwrap();
        assert_eq!(params.sampling_time, 0.02);
        assert_eq!(params.observer_gains, [0.2, 0.3]);
        assert_eq!(params.epsilon, FesParams::default().epsilon);
        assert!(matches!(params.prefilter, PrefilterParams::StateSpace { .. }));
        let mut filter = params.prefilter.build().unwrap();
        assert_eq!(filter.update(1.5), 1.5);
    }

    #[test]
    fn test_partial_es_table_uses_defaults() {
        let params: EsParams = toml::from_str("optimiser_gain = -2.0\ndecimation = 5").unwrap();
        assert_eq!(params.optimiser_gain, -2.0);
        assert_eq!(params.decimation, 5);
        assert_eq!(params.cutoff, 0.1);
        params.validate().unwrap();
    }
}
