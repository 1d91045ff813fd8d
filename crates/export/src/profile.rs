//! Per-body distance/speed profiles, one file per body.
//!
//! Each file starts with a `#` comment header and then carries one
//! `distance_au,speed_m_s` line per step, taken at the start of the step.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, Terminator, WriterBuilder};
use nbody_core::units::m_to_au;

use crate::trajectory::{ExportError, check_body_names};

pub const PROFILE_HEADER: &str = "#||pos (a.u.)||, ||vel (m/s)||";

/// `<dir>/<name>.txt`
pub fn profile_path(dir: &Path, body_name: &str) -> PathBuf {
    dir.join(format!("{body_name}.txt"))
}

/// Profile writers indexed like the body collection.
pub struct ProfileSet<W: Write> {
    writers: Vec<csv::Writer<W>>,
    lines: u64,
}

impl ProfileSet<BufWriter<File>> {
    /// Create (truncating) one profile file per body under `dir`.
    pub fn create<S: AsRef<str>>(dir: &Path, body_names: &[S]) -> Result<Self, ExportError> {
        check_body_names(body_names)?;
        fs::create_dir_all(dir)?;
        let writers = body_names
            .iter()
            .map(|name| File::create(profile_path(dir, name.as_ref())).map(BufWriter::new))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_writers(writers)
    }
}

impl<W: Write> ProfileSet<W> {
    /// Wrap already-open sinks and write the comment header to each.
    pub fn from_writers(sinks: Vec<W>) -> Result<Self, ExportError> {
        let mut writers = Vec::with_capacity(sinks.len());
        for mut sink in sinks {
            writeln!(sink, "{PROFILE_HEADER}")?;
            writers.push(
                WriterBuilder::new()
                    .terminator(Terminator::Any(b'\n'))
                    .quote_style(QuoteStyle::Never)
                    .from_writer(sink),
            );
        }
        Ok(Self { writers, lines: 0 })
    }

    pub fn len(&self) -> usize {
        self.writers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writers.is_empty()
    }

    /// Lines written per body so far.
    pub fn lines(&self) -> u64 {
        self.lines
    }

    /// Append one `(distance_m, speed_m_s)` line per body, in body order.
    pub fn record<I>(&mut self, states: I) -> Result<(), ExportError>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut written = 0;
        for (writer, (distance_m, speed_m_s)) in self.writers.iter_mut().zip(states) {
            writer.write_record([
                format!("{:?}", m_to_au(distance_m)),
                format!("{speed_m_s:?}"),
            ])?;
            written += 1;
        }
        if written != self.writers.len() {
            return Err(ExportError::ColumnMismatch {
                tick: self.lines as usize,
                expected: self.writers.len(),
                found: written,
            });
        }
        self.lines += 1;
        Ok(())
    }

    /// Flush every file and hand back the sinks.
    pub fn finish(self) -> Result<Vec<W>, ExportError> {
        self.writers
            .into_iter()
            .map(|writer| writer.into_inner().map_err(|err| ExportError::Io(err.into_error())))
            .collect()
    }
}
