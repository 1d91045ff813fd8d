//! Output plumbing shared by the binaries.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use anyhow::Context;
use nbody_trajectories::export::summary::{summary_path_for, write_summary as write_summary_json};
use nbody_trajectories::export::{RunSummary, writer_for_path};
use nbody_trajectories::propagator::Trajectory;
use tracing_subscriber::EnvFilter;

/// Log to stderr so `-` can stream the table on stdout. `RUST_LOG` overrides the
/// default `warn` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn is_stdout(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn write_table(path: &Path, trajectory: &Trajectory) -> anyhow::Result<()> {
    let writer = writer_for_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    trajectory
        .write_to(writer)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Write `<stem>_summary.json` beside `output` and return its path.
pub fn write_summary(output: &Path, summary: &RunSummary) -> anyhow::Result<PathBuf> {
    let path = summary_path_for(output);
    write_summary_json(&path, summary)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
