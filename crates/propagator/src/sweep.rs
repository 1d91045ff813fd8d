//! Parameter sweeps over injection angle and delta-v. Every combination is an
//! independent run; nothing is shared between them.

use std::str::FromStr;

use nbody_config::FreeReturnConfig;
use nbody_export::RunSummary;
use thiserror::Error;
use tracing::info_span;

use crate::scenario::free_return::{self, InjectionParams};
use crate::simulation::{SimulationError, Trajectory};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SweepAxisError {
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("range step must be non-zero and move from start toward end")]
    InvalidStep,
    #[error("range '{0}' must look like start:end:step")]
    MalformedRange(String),
    #[error("sweep axis has no values")]
    Empty,
    #[error("range yields {count} values, more than the {max} a sweep axis may hold")]
    TooManyValues { count: f64, max: usize },
}

/// Largest number of values a single axis may expand to.
pub const MAX_AXIS_VALUES: usize = 10_000;

/// Values taken by one swept parameter.
///
/// Parsed from a single value (`3150`), a list (`3145,3147,3149`), or a half-open
/// range `start:end:step` (`3145:3155:2` gives 3145, 3147, ..., 3153).
#[derive(Debug, Clone, PartialEq)]
pub struct SweepAxis {
    values: Vec<f64>,
}

impl SweepAxis {
    pub fn single(value: f64) -> Self {
        Self {
            values: vec![value],
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl FromStr for SweepAxis {
    type Err = SweepAxisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let values = if s.contains(':') {
            let parts: Vec<&str> = s.split(':').collect();
            let [start, end, step] = parts.as_slice() else {
                return Err(SweepAxisError::MalformedRange(s.to_string()));
            };
            stepped(parse_number(start)?, parse_number(end)?, parse_number(step)?)?
        } else {
            s.split(',')
                .filter(|part| !part.trim().is_empty())
                .map(parse_number)
                .collect::<Result<Vec<_>, _>>()?
        };
        if values.is_empty() {
            return Err(SweepAxisError::Empty);
        }
        Ok(Self { values })
    }
}

fn parse_number(text: &str) -> Result<f64, SweepAxisError> {
    let text = text.trim();
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| SweepAxisError::InvalidNumber(text.to_string()))
}

/// Values `start, start + step, ...` strictly before `end`.
pub fn stepped(start: f64, end: f64, step: f64) -> Result<Vec<f64>, SweepAxisError> {
    if step == 0.0 || !step.is_finite() || (end - start) * step < 0.0 {
        return Err(SweepAxisError::InvalidStep);
    }
    let count = ((end - start) / step).ceil().max(0.0);
    if count > MAX_AXIS_VALUES as f64 {
        return Err(SweepAxisError::TooManyValues {
            count,
            max: MAX_AXIS_VALUES,
        });
    }
    let count = count as usize;
    Ok((0..count).map(|i| start + i as f64 * step).collect())
}

/// Cartesian product of the axes, angle-major.
pub fn injections(
    angles: &SweepAxis,
    delta_vs: &SweepAxis,
    steps_per_second: f64,
) -> Vec<InjectionParams> {
    angles
        .values()
        .iter()
        .flat_map(|&angle_deg| {
            delta_vs.values().iter().map(move |&delta_v_m_s| InjectionParams {
                angle_deg,
                delta_v_m_s,
                steps_per_second,
            })
        })
        .collect()
}

/// Result of one sweep member.
#[derive(Debug, Clone)]
pub struct SweepOutcome {
    pub injection: InjectionParams,
    pub result: Result<Trajectory, SimulationError>,
    /// Absent when the run could not be constructed.
    pub summary: Option<RunSummary>,
}

impl SweepOutcome {
    pub fn file_name(&self) -> String {
        free_return::output_file_name(&self.injection)
    }
}

/// Build and run a single free-return simulation.
pub fn run_one(config: &FreeReturnConfig, injection: InjectionParams) -> SweepOutcome {
    let _span = info_span!(
        "sweep_run",
        angle_deg = injection.angle_deg,
        delta_v_m_s = injection.delta_v_m_s
    )
    .entered();

    match free_return::build(config, &injection) {
        Ok(mut simulation) => {
            let result = simulation.run();
            let summary = simulation.summary(free_return::SCENARIO_NAME);
            SweepOutcome {
                injection,
                result,
                summary: Some(summary),
            }
        }
        Err(err) => SweepOutcome {
            injection,
            result: Err(err),
            summary: None,
        },
    }
}

/// Lazily run every injection in order.
pub fn run_sweep<'a>(
    config: &'a FreeReturnConfig,
    injections: Vec<InjectionParams>,
) -> impl Iterator<Item = SweepOutcome> + 'a {
    injections
        .into_iter()
        .map(move |injection| run_one(config, injection))
}
