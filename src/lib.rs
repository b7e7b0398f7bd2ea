//! es-adapt - Extremum Seeking adaptation
//!
//! Model-free online optimisation of a single scalar parameter. A sinusoidal
//! dither perturbs the parameter, the measured performance signal is
//! demodulated into gradient (and optionally Hessian) estimates, and an
//! optimiser drives the parameter towards the extremum inside fixed limits.
//!
//! Two compositions are provided: [`ExtremumSeeker`] (gradient descent or
//! ascent) and [`FastExtremumSeeker`] (pre-filtered, switching between
//! gradient and Newton steps).

pub mod dither;
pub mod error;
pub mod estimator;
pub mod filter;
pub mod linalg;
pub mod manager;
pub mod optimiser;
pub mod params;
pub mod sim;

// Re-export main types
pub use dither::{DitherGenerator, SineDither};
pub use error::{EsError, Result};
pub use estimator::{Estimator, GradientEstimator, GradientHessianObserver, Reference};
pub use filter::{
    BandPassFilter, Filter, HighPassFilter, LowPassFilter, MovingAverageFilter, StateSpaceFilter,
};
pub use manager::{AdaptationManager, AdaptationParameter, ExtremumSeeker, FastExtremumSeeker};
pub use optimiser::{GradientOptimiser, Optimiser, Step, SwitchingOptimiser};
pub use params::{EsParams, FesParams, PrefilterParams};
