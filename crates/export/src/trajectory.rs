//! Whitespace-delimited trajectory tables consumed by the plotting scripts.
//!
//! Layout: a header `t <body>_x <body>_y ...` followed by one line per sample. Every
//! value is written with zero decimals (metres, seconds). Column order and rounding
//! are a compatibility contract with downstream readers.

use std::io::{Read, Write};

use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};
use nbody_core::Vector2;
use thiserror::Error;

const TIME_COLUMN: &str = "t";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("i/o failure while exporting: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed trajectory table: {0}")]
    Csv(#[from] csv::Error),
    #[error("sample {tick} carries {found} positions, expected {expected}")]
    ColumnMismatch {
        tick: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: value '{value}' is not an integer")]
    InvalidValue { line: u64, value: String },
    #[error("header must start with the 't' column")]
    MissingTimeColumn,
    #[error("body name '{0}' must be non-empty without whitespace or path separators")]
    InvalidBodyName(String),
}

/// Body names double as column prefixes and profile file stems, so they must be a
/// single non-empty token.
pub fn is_valid_body_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(|c| c.is_whitespace() || c == '/' || c == '\\')
}

pub(crate) fn check_body_names<S: AsRef<str>>(body_names: &[S]) -> Result<(), ExportError> {
    match body_names.iter().find(|n| !is_valid_body_name(n.as_ref())) {
        Some(name) => Err(ExportError::InvalidBodyName(name.as_ref().to_string())),
        None => Ok(()),
    }
}

/// Header fields for the given body names (lowercased).
pub fn header_columns<S: AsRef<str>>(body_names: &[S]) -> Vec<String> {
    let mut columns = Vec::with_capacity(1 + 2 * body_names.len());
    columns.push(TIME_COLUMN.to_string());
    for name in body_names {
        let name = name.as_ref().to_lowercase();
        columns.push(format!("{name}_x"));
        columns.push(format!("{name}_y"));
    }
    columns
}

/// Write a trajectory table.
///
/// `rows` yields `(tick, positions)` with positions in `body_names` order; the time
/// column is `tick * export_interval_s`. Names that would split a header field are
/// rejected before anything is written.
pub fn write_trajectory<'a, W, S, I>(
    writer: W,
    body_names: &[S],
    export_interval_s: f64,
    rows: I,
) -> Result<(), ExportError>
where
    W: Write,
    S: AsRef<str>,
    I: IntoIterator<Item = (usize, &'a [Vector2])>,
{
    check_body_names(body_names)?;
    let mut out = WriterBuilder::new()
        .delimiter(b' ')
        .terminator(Terminator::Any(b'\n'))
        .quote_style(QuoteStyle::Never)
        .from_writer(writer);

    out.write_record(header_columns(body_names))?;

    let mut fields: Vec<String> = Vec::with_capacity(1 + 2 * body_names.len());
    for (tick, positions) in rows {
        if positions.len() != body_names.len() {
            return Err(ExportError::ColumnMismatch {
                tick,
                expected: body_names.len(),
                found: positions.len(),
            });
        }
        fields.clear();
        fields.push(round_field(tick as f64 * export_interval_s));
        for position in positions {
            fields.push(round_field(position.x));
            fields.push(round_field(position.y));
        }
        out.write_record(&fields)?;
    }
    out.flush()?;
    Ok(())
}

fn round_field(value: f64) -> String {
    format!("{value:.0}")
}

/// Parsed trajectory table with integer cells.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<i64>>,
}

impl TrajectoryTable {
    /// Values of a single named column.
    pub fn column(&self, name: &str) -> Option<Vec<i64>> {
        let index = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| row[index]).collect())
    }

    /// Body names in column order, derived from the `<body>_x` headers.
    pub fn body_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter_map(|c| c.strip_suffix("_x").map(str::to_string))
            .collect()
    }

    /// `(x, y)` pairs for one body, if present.
    pub fn positions(&self, body: &str) -> Option<Vec<(i64, i64)>> {
        let xs = self.column(&format!("{body}_x"))?;
        let ys = self.column(&format!("{body}_y"))?;
        Some(xs.into_iter().zip(ys).collect())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parse a table produced by [`write_trajectory`]. Runs of whitespace are not
/// collapsed; cells must be separated by single spaces.
pub fn read_trajectory<R: Read>(reader: R) -> Result<TrajectoryTable, ExportError> {
    let mut input = ReaderBuilder::new()
        .delimiter(b' ')
        .has_headers(true)
        .from_reader(reader);

    let columns: Vec<String> = input.headers()?.iter().map(str::to_string).collect();
    if columns.first().map(String::as_str) != Some(TIME_COLUMN) {
        return Err(ExportError::MissingTimeColumn);
    }

    let mut rows = Vec::new();
    for record in input.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let row = record
            .iter()
            .map(|cell| {
                cell.trim().parse::<i64>().map_err(|_| ExportError::InvalidValue {
                    line,
                    value: cell.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }

    Ok(TrajectoryTable { columns, rows })
}
