use es_adapt::sim::{peak_deviation, run_simulation, settling_step, QuadraticPlant, SimConfig};
use es_adapt::{AdaptationManager, EsParams, FesParams};

fn iterations(steps: usize) -> SimConfig {
    SimConfig {
        steps,
        ..Default::default()
    }
}

#[test]
fn test_extremum_seeker_descends_quadratic_cost() {
    let mut es = EsParams::default().build().unwrap();
    let plant = QuadraticPlant::new(5.0, 1.0, 0.0);
    let results = run_simulation(&mut es, &plant, &iterations(10_000)).unwrap();

    let last = results.last().unwrap();
    assert!(last.error.abs() < 0.1, "theta_bar = {}", last.theta_bar);
    assert!(peak_deviation(&results, 9_000) < 0.2);
    let settled = settling_step(&results, 0.5).unwrap();
    assert!(settled < 5_000, "settled at {settled}");
    assert!(results.iter().all(|s| (-10.0..=10.0).contains(&s.theta)));
}

#[test]
fn test_fast_extremum_seeker_climbs_concave_performance() {
    let mut fes = FesParams::default().build().unwrap();
    let plant = QuadraticPlant::new(5.0, -10.0, 0.0);
    let results = run_simulation(&mut fes, &plant, &iterations(10_000)).unwrap();

    let last = results.last().unwrap();
    assert!(last.error.abs() < 0.01, "theta_bar = {}", last.theta_bar);
    // [uf, du, d2u, theta_bar]; the plant's second derivative is -20
    assert_eq!(last.diagnostics.len(), 4);
    let d2u = last.diagnostics[2];
    assert!((-25.0..-15.0).contains(&d2u), "d2u = {d2u}");
    assert_eq!(last.diagnostics[3], last.theta_bar);
    assert!(results.iter().all(|s| (-10.0..=10.0).contains(&s.theta)));
}

#[test]
fn test_newton_steps_settle_before_gradient_steps() {
    let mut es = EsParams::default().build().unwrap();
    let mut fes = FesParams::default().build().unwrap();
    let config = iterations(10_000);
    let es_run = run_simulation(&mut es, &QuadraticPlant::new(5.0, 1.0, 0.0), &config).unwrap();
    let fes_run =
        run_simulation(&mut fes, &QuadraticPlant::new(5.0, -10.0, 0.0), &config).unwrap();

    let es_settled = settling_step(&es_run, 0.1).unwrap();
    let fes_settled = settling_step(&fes_run, 0.1).unwrap();
    assert!(fes_settled < es_settled, "fes {fes_settled} vs es {es_settled}");
}

#[test]
fn test_extremum_seeker_tolerates_measurement_noise() {
    let mut es = EsParams::default().build().unwrap();
    let config = SimConfig {
        noise_sigma: 0.05,
        ..iterations(10_000)
    };
    let results = run_simulation(&mut es, &QuadraticPlant::new(5.0, 1.0, 0.0), &config).unwrap();
    let last = results.last().unwrap();
    assert!(last.error.abs() < 0.2, "theta_bar = {}", last.theta_bar);
}

#[test]
fn test_binding_limit_holds_parameter() {
    let mut params = EsParams::default();
    params.limits.max = 3.0;
    let mut es = params.build().unwrap();
    let plant = QuadraticPlant::new(5.0, 1.0, 0.0);
    let results = run_simulation(&mut es, &plant, &iterations(8_000)).unwrap();
    assert!(results.iter().all(|s| s.theta <= 3.0));
    assert_eq!(es.parameter(), 3.0);
}

#[test]
fn test_reset_restores_initial_trajectory() {
    let mut fes = FesParams::default().build().unwrap();
    let plant = QuadraticPlant::new(5.0, -10.0, 0.0);
    let config = iterations(500);
    let first = run_simulation(&mut fes, &plant, &config).unwrap();
    fes.reset();
    let second = run_simulation(&mut fes, &plant, &config).unwrap();
    assert_eq!(first, second);
}
