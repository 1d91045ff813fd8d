//! Batch of independent free-return runs over injection angle and delta-v.
//!
//! Each combination writes `out_<angle>_<dv>.txt` into the output directory, the
//! naming the plotting scripts expect.

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use nbody_trajectories::config::{FreeReturnConfig, load_free_return};
use nbody_trajectories::propagator::sweep::{self, SweepAxis};
use nbody_trajectories::propagator::run_sweep;

#[path = "shared/output.rs"]
mod output;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Sweep free-return injections over angle and delta-v"
)]
struct Cli {
    /// Injection angles in degrees: value, list (a,b,c) or half-open range (start:end:step)
    #[arg(long, allow_hyphen_values = true, default_value = "-123.7")]
    angles: SweepAxis,

    /// Injection delta-v values in m/s, same syntax as --angles
    #[arg(long, allow_hyphen_values = true, default_value = "3145:3155:2")]
    delta_vs: SweepAxis,

    /// Integration steps per simulated second
    #[arg(long, default_value_t = 10.0)]
    steps_per_second: f64,

    /// YAML/TOML manifest overriding the physical constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory receiving one table per run
    #[arg(long, default_value = "artifacts/sweep")]
    output_dir: PathBuf,

    /// Also write a JSON run summary for every run
    #[arg(long, default_value_t = false)]
    summary: bool,
}

fn main() -> anyhow::Result<()> {
    output::init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_free_return(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => FreeReturnConfig::default(),
    };

    let injections = sweep::injections(&cli.angles, &cli.delta_vs, cli.steps_per_second);
    let total = injections.len();
    std::fs::create_dir_all(&cli.output_dir)
        .with_context(|| format!("failed to create {}", cli.output_dir.display()))?;

    let mut failures = 0usize;
    for outcome in run_sweep(&config, injections) {
        let path = cli.output_dir.join(outcome.file_name());
        if cli.summary {
            if let Some(summary) = &outcome.summary {
                output::write_summary(&path, summary)?;
            }
        }
        match &outcome.result {
            Ok(trajectory) => {
                output::write_table(&path, trajectory)?;
                println!(
                    "[ok] {} ({} samples)",
                    path.display(),
                    trajectory.samples.len()
                );
            }
            Err(err) => {
                failures += 1;
                println!(
                    "[failed] angle={} dv={}: {}",
                    outcome.injection.angle_deg, outcome.injection.delta_v_m_s, err
                );
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {total} runs failed");
    }
    Ok(())
}
