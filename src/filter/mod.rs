//! Discrete SISO filters used to condition the measured performance signal.

use crate::error::Result;

pub mod band_pass;
pub mod first_order;
pub mod moving_average;
pub mod state_space;

pub use band_pass::BandPassFilter;
pub use first_order::{FirstOrderFilter, HighPass, HighPassFilter, LowPass, LowPassFilter};
pub use moving_average::MovingAverageFilter;
pub use state_space::StateSpaceFilter;

/// Common contract of every filter.
///
/// Setters that a filter has no use for accept their argument after
/// validation and leave the recursion untouched.
pub trait Filter {
    /// Cutoff `wo` in rad per unit of time; must be > 0.
    fn set_cutoff_frequency(&mut self, cutoff: f64) -> Result<()>;
    /// Output gain `g`.
    fn set_gain(&mut self, gain: f64) -> Result<()>;
    /// Must be > 0.
    fn set_sampling_time(&mut self, sampling_time: f64) -> Result<()>;
    /// Filters one sample.
    fn update(&mut self, u: f64) -> f64;
    /// Zeroes the filter memory, keeping the configuration.
    fn reset(&mut self);
}

/// Rounds to two decimals, ties to even.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::round2;

    #[test]
    fn test_round2_ties_to_even() {
        assert_eq!(round2(1.875), 1.88);
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(-0.333), -0.33);
        assert_eq!(round2(0.004), 0.0);
    }
}
