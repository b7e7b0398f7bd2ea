//! Quadratic Plant Example
//!
//! Runs the standard and the Newton-accelerated extremum seekers against a
//! static quadratic plant and writes both trajectories to CSV.
//!
//! Usage: `cargo run --example quadratic_plant [config.toml]`

use std::fs;

use anyhow::Context;
use es_adapt::sim::{
    peak_deviation, rms_error, run_simulation, settling_step, QuadraticPlant, SimConfig, SimStep,
};
use es_adapt::{EsParams, FesParams};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DemoConfig {
    sim: SimConfig,
    optimum: f64,
    es: EsParams,
    fes: FesParams,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            sim: SimConfig::default(),
            optimum: 5.0,
            es: EsParams::default(),
            fes: FesParams::default(),
        }
    }
}

fn load_config() -> anyhow::Result<DemoConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let raw = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            toml::from_str(&raw).with_context(|| format!("parsing {path}"))
        }
        None => Ok(DemoConfig::default()),
    }
}

fn write_csv(path: &str, results: &[SimStep]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    let channels = results.first().map_or(0, |s| s.diagnostics.len());
    let mut header = vec!["t".to_string(), "u".into(), "theta".into(), "theta_bar".into()];
    header.extend((0..channels).map(|i| format!("state_{i}")));
    writer.write_record(&header)?;

    for step in results {
        let mut record = vec![
            format!("{:.6}", step.t),
            format!("{:.6}", step.u),
            format!("{:.6}", step.theta),
            format!("{:.6}", step.theta_bar),
        ];
        record.extend(step.diagnostics.iter().map(|v| format!("{v:.6}")));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn summarize(name: &str, results: &[SimStep]) {
    let tail = results.len().saturating_sub(1000);
    let errors: Vec<f64> = results[tail..].iter().map(|s| s.error).collect();
    println!("\n{name}:");
    if let Some(last) = results.last() {
        println!("  Final theta_bar:     {:.6}", last.theta_bar);
    }
    println!("  RMS error (tail):    {:.6}", rms_error(&errors));
    println!("  Peak error (tail):   {:.6}", peak_deviation(results, tail));
    match settling_step(results, 0.1) {
        Some(step) => println!("  Settled (|e| < 0.1): step {step}"),
        None => println!("  Settled (|e| < 0.1): never"),
    }
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = load_config()?;
    config.es.validate().context("invalid [es] section")?;
    config.fes.validate().context("invalid [fes] section")?;
    config.sim.validate().context("invalid [sim] section")?;

    println!("Running extremum seeking on a quadratic plant...\n");
    println!("Configuration:");
    println!("  Steps:       {}", config.sim.steps);
    println!("  Time step:   {}", config.sim.time_step);
    println!("  Noise sigma: {}", config.sim.noise_sigma);
    println!("  Optimum:     {}", config.optimum);

    // The gradient seeker descends a cost, the Newton seeker climbs a performance
    let cost = QuadraticPlant::new(config.optimum, 1.0, 0.0);
    let performance = QuadraticPlant::new(config.optimum, -10.0, 0.0);

    let mut es = config.es.build()?;
    let es_results = run_simulation(&mut es, &cost, &config.sim)?;
    let mut fes = config.fes.build()?;
    let fes_results = run_simulation(&mut fes, &performance, &config.sim)?;

    println!("\nMETRICS SUMMARY");
    println!("===============");
    summarize("Extremum seeking", &es_results);
    summarize("Fast extremum seeking", &fes_results);

    fs::create_dir_all("out")?;
    write_csv("out/es.csv", &es_results)?;
    write_csv("out/fes.csv", &fes_results)?;

    println!("\nCSV output written to: out/es.csv, out/fes.csv");
    println!("Done!");

    Ok(())
}
