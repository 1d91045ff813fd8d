//! JSON sidecar describing a finished (or failed) run.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::to_writer_pretty;

/// Final state and extremes of one body over the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySummary {
    pub name: String,
    pub mass_kg: f64,
    pub final_position_m: [f64; 2],
    pub final_velocity_m_s: [f64; 2],
    pub min_distance_m: f64,
    pub max_distance_m: f64,
    pub min_speed_m_s: f64,
    pub max_speed_m_s: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub scenario: String,
    pub status: String,
    pub steps: u64,
    pub dt_s: f64,
    pub elapsed_s: f64,
    pub export_interval_s: f64,
    pub samples: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub bodies: Vec<BodySummary>,
}

/// Sidecar path for an export target: `<dir>/<stem>_summary.json`.
pub fn summary_path_for(output: &Path) -> PathBuf {
    let parent = output.parent().unwrap_or_else(|| Path::new("."));
    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| *s != "-")
        .unwrap_or("trajectory");
    parent.join(format!("{stem}_summary.json"))
}

/// Write the summary as pretty-printed JSON, creating parent directories.
pub fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    to_writer_pretty(File::create(path)?, summary)?;
    Ok(())
}
