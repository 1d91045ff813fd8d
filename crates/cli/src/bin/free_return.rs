//! Earth–Moon free-return propagator.
//!
//! Takes the injection angle (deg), injection delta-v (m/s) and integration steps per
//! second, runs ten simulated days, and writes the corotating-frame table the plotting
//! scripts read.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use clap::error::ErrorKind;
use nbody_trajectories::config::{FreeReturnConfig, load_free_return};
use nbody_trajectories::propagator::scenario::free_return::{self, SPACECRAFT};
use nbody_trajectories::propagator::InjectionParams;

#[path = "shared/output.rs"]
mod output;

const USAGE: &str =
    "Usage: free_return <injection_angle_deg:float> <injection_dv:float> <sim_step_per_sec:float>";
const EXAMPLE: &str = "Example: free_return -123.7 3150 10";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Earth–Moon free-return trajectory propagator",
    allow_negative_numbers = true
)]
struct Cli {
    /// Injection point angle around Earth (degrees)
    injection_angle_deg: f64,

    /// Delta-v added on top of the parking-orbit circular speed (m/s)
    injection_dv: f64,

    /// Integration steps per simulated second
    sim_step_per_sec: f64,

    /// YAML/TOML manifest overriding the physical constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output table (use '-' for stdout)
    #[arg(long, default_value = "out.txt")]
    output: PathBuf,

    /// Also write a JSON run summary next to the output
    #[arg(long, default_value_t = false)]
    summary: bool,
}

fn main() -> ExitCode {
    output::init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("{err}");
            eprintln!("{USAGE}");
            eprintln!("{EXAMPLE}");
            return ExitCode::from(1);
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("[error] {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => load_free_return(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => FreeReturnConfig::default(),
    };
    let injection = InjectionParams {
        angle_deg: cli.injection_angle_deg,
        delta_v_m_s: cli.injection_dv,
        steps_per_second: cli.sim_step_per_sec,
    };
    let report = !output::is_stdout(&cli.output);

    if report {
        println!("Args");
        println!("\tinjection_angle_deg: {:.3}", injection.angle_deg);
        println!("\tinjection_dv: {:.3}", injection.delta_v_m_s);
        println!("\tsim_step_per_sec: {:.3}", injection.steps_per_second);
        println!();
    }

    let mut simulation = free_return::build(&config, &injection)?;

    if report {
        println!("Initial state");
        for body in simulation.bodies() {
            println!(
                "\t{:<11} pos = ({:.0}, {:.0}) m, vel = ({:.3}, {:.3}) m/s",
                body.name, body.position.x, body.position.y, body.velocity.x, body.velocity.y
            );
        }
        println!();
    }

    let result = simulation.run();
    if cli.summary {
        let path = output::write_summary(
            &cli.output,
            &simulation.summary(free_return::SCENARIO_NAME),
        )?;
        if report {
            println!("Summary written to {}", path.display());
        }
    }
    let trajectory = result?;

    if report {
        println!("Samples: {}", trajectory.samples.len());
        if let Some(last) = trajectory.last() {
            let spacecraft = last.positions[SPACECRAFT];
            println!("Spacecraft final position {:.0} {:.0}", spacecraft.x, spacecraft.y);
        }
    }

    output::write_table(&cli.output, &trajectory)
}
