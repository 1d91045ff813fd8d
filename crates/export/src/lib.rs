//! Export helpers for trajectory tables and JSON run summaries.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

pub mod profile;
pub mod summary;
pub mod trajectory;

pub use profile::{ProfileSet, profile_path};
pub use summary::{BodySummary, RunSummary};
pub use trajectory::{
    ExportError, TrajectoryTable, is_valid_body_name, read_trajectory, write_trajectory,
};

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}
