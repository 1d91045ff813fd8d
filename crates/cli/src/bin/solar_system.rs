//! Sun-plus-planets propagation from a body catalog.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use nbody_trajectories::config::load_solar_system;
use nbody_trajectories::export::ProfileSet;
use nbody_trajectories::propagator::scenario::solar_system;
use nbody_trajectories::time::seconds_to_days;
use nbody_trajectories::units::m_to_au;

#[path = "shared/output.rs"]
mod output;

#[derive(Parser, Debug)]
#[command(author, version, about = "Solar-system N-body simulator")]
struct Cli {
    /// Body catalog (YAML or TOML)
    #[arg(long, default_value = "configs/solar_system.yaml")]
    config: PathBuf,

    /// Output table (use '-' for stdout)
    #[arg(long, default_value = "artifacts/solar_system.txt")]
    output: PathBuf,

    /// Also write a JSON run summary next to the output
    #[arg(long, default_value_t = false)]
    summary: bool,

    /// Directory receiving one `<Body>.txt` distance/speed profile per body
    #[arg(long)]
    profiles: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    output::init_tracing();
    let cli = Cli::parse();

    let catalog = load_solar_system(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    let mut simulation = solar_system::build(&catalog)?;

    let names: Vec<String> = simulation.bodies().iter().map(|b| b.name.clone()).collect();
    let result = match &cli.profiles {
        Some(dir) => {
            let mut profiles = ProfileSet::create(dir, &names)
                .with_context(|| format!("failed to create profiles in {}", dir.display()))?;
            let result = simulation.run_observed(None, &mut profiles);
            profiles
                .finish()
                .with_context(|| format!("failed to flush profiles in {}", dir.display()))?;
            result
        }
        None => simulation.run(),
    };
    if cli.summary {
        output::write_summary(&cli.output, &simulation.summary(solar_system::SCENARIO_NAME))?;
    }
    let trajectory = result?;
    output::write_table(&cli.output, &trajectory)?;

    if !output::is_stdout(&cli.output) {
        println!(
            "Simulation ran on {:.0} days ({} steps, {} samples)",
            seconds_to_days(simulation.elapsed_s()),
            simulation.steps(),
            trajectory.samples.len()
        );
        println!();
        for (body, extremes) in simulation.bodies().iter().zip(simulation.extremes()) {
            println!(
                "{:<8} D(min): {:.6} AU  D(max): {:.6} AU  V(min): {:.1} m/s  V(max): {:.1} m/s",
                body.name,
                m_to_au(extremes.min_distance_m),
                m_to_au(extremes.max_distance_m),
                extremes.min_speed_m_s,
                extremes.max_speed_m_s,
            );
        }
    }
    Ok(())
}
