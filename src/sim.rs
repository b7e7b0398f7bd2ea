//! Simulation harness for adaptation managers
//!
//! Closes the loop around a static quadratic plant with optional Gaussian
//! measurement noise and reports convergence metrics.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ensure_finite, ensure_positive, EsError, Result};
use crate::manager::AdaptationManager;

/// Static plant `u = offset + curvature * (theta - optimum)^2`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadraticPlant {
    pub optimum: f64,
    /// Positive for a cost to minimise, negative for a performance to maximise
    pub curvature: f64,
    pub offset: f64,
}

impl QuadraticPlant {
    pub fn new(optimum: f64, curvature: f64, offset: f64) -> Self {
        Self {
            optimum,
            curvature,
            offset,
        }
    }

    pub fn response(&self, theta: f64) -> f64 {
        let d = theta - self.optimum;
        self.offset + self.curvature * d * d
    }
}

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub steps: usize,
    /// Time advanced per tick; 1.0 runs the loop in iteration units
    pub time_step: f64,
    pub noise_sigma: f64,
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            steps: 10_000,
            time_step: 1.0,
            noise_sigma: 0.0,
            seed: 42,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<()> {
        if self.steps == 0 {
            return Err(EsError::InvalidArgument(
                "simulation needs at least one step".into(),
            ));
        }
        ensure_positive("time step", self.time_step)?;
        ensure_finite("noise sigma", self.noise_sigma)?;
        if self.noise_sigma < 0.0 {
            return Err(EsError::InvalidArgument(format!(
                "noise sigma must be non-negative, got {}",
                self.noise_sigma
            )));
        }
        Ok(())
    }
}

/// Simulation results for one tick
#[derive(Debug, Clone, PartialEq)]
pub struct SimStep {
    pub t: f64,
    /// Measurement fed to the manager, noise included
    pub u: f64,
    pub theta: f64,
    pub theta_bar: f64,
    /// `theta_bar - optimum`
    pub error: f64,
    pub diagnostics: Vec<f64>,
}

/// Drive `manager` against `plant` for `config.steps` ticks.
///
/// Each tick measures the plant at the parameter applied on the previous
/// tick, so the loop carries the one-sample delay of a real actuator.
pub fn run_simulation(
    manager: &mut dyn AdaptationManager,
    plant: &QuadraticPlant,
    config: &SimConfig,
) -> Result<Vec<SimStep>> {
    config.validate()?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let noise = Normal::new(0.0, config.noise_sigma)
        .map_err(|e| EsError::InvalidArgument(format!("noise distribution: {e}")))?;

    let mut results = Vec::with_capacity(config.steps);
    for step in 0..config.steps {
        let t = step as f64 * config.time_step;
        let mut u = plant.response(manager.parameter());
        if config.noise_sigma > 0.0 {
            u += noise.sample(&mut rng);
        }

        let theta = manager.update_parameter(u, t)?;
        let theta_bar = manager.theta_bar();
        results.push(SimStep {
            t,
            u,
            theta,
            theta_bar,
            error: theta_bar - plant.optimum,
            diagnostics: manager.diagnostics().to_vec(),
        });
    }

    if let Some(last) = results.last() {
        info!(
            steps = config.steps,
            theta_bar = last.theta_bar,
            error = last.error,
            "simulation finished"
        );
    }
    Ok(results)
}

/// Calculate RMS error; zero for an empty slice
pub fn rms_error(errors: &[f64]) -> f64 {
    if errors.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = errors.iter().map(|&e| e * e).sum();
    (sum_sq / errors.len() as f64).sqrt()
}

/// Largest `|error|` from tick `from` onwards
pub fn peak_deviation(results: &[SimStep], from: usize) -> f64 {
    results
        .iter()
        .skip(from)
        .map(|step| step.error.abs())
        .fold(0.0f64, f64::max)
}

/// First tick after which `|error|` stays below `tolerance` for the rest of the run
pub fn settling_step(results: &[SimStep], tolerance: f64) -> Option<usize> {
    let last_outside = results
        .iter()
        .rposition(|step| step.error.abs() >= tolerance);
    match last_outside {
        None if results.is_empty() => None,
        None => Some(0),
        Some(i) if i + 1 < results.len() => Some(i + 1),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::EsParams;

    fn step(error: f64) -> SimStep {
        SimStep {
            t: 0.0,
            u: 0.0,
            theta: 0.0,
            theta_bar: error,
            error,
            diagnostics: Vec::new(),
        }
    }

    #[test]
    fn test_plant_response() {
        let plant = QuadraticPlant::new(5.0, -10.0, 1.0);
        assert_eq!(plant.response(5.0), 1.0);
        assert_eq!(plant.response(4.0), -9.0);
    }

    #[test]
    fn test_simulation_runs() {
        let mut es = EsParams::default().build().unwrap();
        let config = SimConfig {
            steps: 100,
            ..Default::default()
        };
        let results = run_simulation(&mut es, &QuadraticPlant::new(5.0, 1.0, 0.0), &config).unwrap();
        assert_eq!(results.len(), 100);
        assert_eq!(results[99].t, 99.0);
        assert!(results.iter().all(|s| (-10.0..=10.0).contains(&s.theta)));
    }

    #[test]
    fn test_seeded_noise_is_reproducible() {
        let plant = QuadraticPlant::new(2.0, 1.0, 0.0);
        let config = SimConfig {
            steps: 200,
            noise_sigma: 0.05,
            seed: 7,
            ..Default::default()
        };
        let run = || {
            let mut es = EsParams::default().build().unwrap();
            run_simulation(&mut es, &plant, &config).unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut es = EsParams::default().build().unwrap();
        let plant = QuadraticPlant::new(0.0, 1.0, 0.0);
        for config in [
            SimConfig {
                steps: 0,
                ..Default::default()
            },
            SimConfig {
                time_step: 0.0,
                ..Default::default()
            },
            SimConfig {
                noise_sigma: -1.0,
                ..Default::default()
            },
        ] {
            assert!(matches!(
                run_simulation(&mut es, &plant, &config),
                Err(EsError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_rms_error() {
        let errors = vec![0.1, 0.2, 0.3];
        let rms = rms_error(&errors);
        let expected = ((0.01_f64 + 0.04 + 0.09) / 3.0).sqrt();
        assert!((rms - expected).abs() < 1e-10);
        assert_eq!(rms_error(&[]), 0.0);
    }

    #[test]
    fn test_settling_and_peak() {
        let results: Vec<SimStep> = [3.0, -1.0, 0.5, 0.05, -0.02, 0.01]
            .into_iter()
            .map(step)
            .collect();
        assert_eq!(settling_step(&results, 0.1), Some(3));
        assert_eq!(settling_step(&results, 10.0), Some(0));
        assert_eq!(settling_step(&results, 0.001), None);
        assert_eq!(settling_step(&[], 0.1), None);
        assert_eq!(peak_deviation(&results, 0), 3.0);
        assert_eq!(peak_deviation(&results, 2), 0.5);
        assert_eq!(peak_deviation(&results, 10), 0.0);
    }
}
