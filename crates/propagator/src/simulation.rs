//! Fixed-timestep driver: owns the bodies for the whole run, steps them in place,
//! and samples their positions in the output frame.

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use nbody_core::{Rotation2, Vector2};
use nbody_dynamics::{
    Body, CollisionError, NewtonianGravity, SourceSetError, SourceSets, accelerate_all,
    integrate_all,
};
use nbody_export::{
    BodySummary, ExportError, ProfileSet, RunSummary, is_valid_body_name, write_trajectory,
};
use thiserror::Error;
use tracing::{debug, info, trace, warn};

/// Fraction of a step tolerated when comparing accumulated time against boundaries.
const BOUNDARY_TOLERANCE: f64 = 1e-9;

/// Upper bound on the sample buffer reserved up front; longer runs grow it on demand.
const MAX_RESERVED_SAMPLES: usize = 1 << 16;

/// Reference frame in which samples are recorded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Frame {
    Inertial,
    /// Frame turning counter-clockwise at `angular_speed` (rad/s). Samples taken at
    /// elapsed time `t` are rotated by `-angular_speed * t`.
    Rotating { angular_speed: f64 },
}

impl Frame {
    pub fn rotation_at(&self, elapsed_s: f64) -> Rotation2 {
        match self {
            Frame::Inertial => Rotation2::IDENTITY,
            Frame::Rotating { angular_speed } => Rotation2::from_angle(-angular_speed * elapsed_s),
        }
    }

    /// Positions expressed in this frame at `elapsed_s`.
    pub fn transform<I>(&self, positions: I, elapsed_s: f64) -> Vec<Vector2>
    where
        I: IntoIterator<Item = Vector2>,
    {
        let rotation = self.rotation_at(elapsed_s);
        positions.into_iter().map(|p| p.rotate(&rotation)).collect()
    }
}

/// Timing settings for a run. All values in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    pub dt_s: f64,
    pub duration_s: f64,
    pub export_interval_s: f64,
    pub frame: Frame,
}

impl SimulationConfig {
    /// Config with `dt = 1 / steps_per_second`.
    pub fn from_steps_per_second(
        steps_per_second: f64,
        duration_s: f64,
        export_interval_s: f64,
        frame: Frame,
    ) -> Self {
        Self {
            dt_s: 1.0 / steps_per_second,
            duration_s,
            export_interval_s,
            frame,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(self.dt_s.is_finite() && self.dt_s > 0.0) {
            return Err(ConfigurationError::InvalidTimeStep(self.dt_s));
        }
        if !(self.duration_s.is_finite() && self.duration_s > 0.0) {
            return Err(ConfigurationError::InvalidDuration(self.duration_s));
        }
        if !(self.export_interval_s.is_finite() && self.export_interval_s > 0.0) {
            return Err(ConfigurationError::InvalidExportInterval(self.export_interval_s));
        }
        if self.export_interval_s < self.dt_s {
            return Err(ConfigurationError::ExportIntervalBelowStep {
                export_interval_s: self.export_interval_s,
                dt_s: self.dt_s,
            });
        }
        if let Frame::Rotating { angular_speed } = self.frame {
            if !angular_speed.is_finite() {
                return Err(ConfigurationError::InvalidAngularSpeed(angular_speed));
            }
        }
        Ok(())
    }

    /// Number of steps a complete run takes.
    pub fn total_steps(&self) -> u64 {
        (self.duration_s / self.dt_s - BOUNDARY_TOLERANCE).ceil().max(0.0) as u64
    }
}

/// Invalid input detected before any step is taken.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("time step must be positive and finite, got {0}")]
    InvalidTimeStep(f64),
    #[error("duration must be positive and finite, got {0}")]
    InvalidDuration(f64),
    #[error("export interval must be positive and finite, got {0}")]
    InvalidExportInterval(f64),
    #[error("export interval {export_interval_s} s is shorter than the time step {dt_s} s")]
    ExportIntervalBelowStep { export_interval_s: f64, dt_s: f64 },
    #[error("frame angular speed must be finite, got {0}")]
    InvalidAngularSpeed(f64),
    #[error("gravitational constant must be positive and finite, got {0}")]
    InvalidGravitationalConstant(f64),
    #[error("a simulation needs at least one body")]
    NoBodies,
    #[error("body name '{0}' must be non-empty without whitespace or path separators")]
    InvalidBodyName(String),
    #[error("body '{body}' has invalid mass {mass}")]
    InvalidMass { body: String, mass: f64 },
    #[error("body '{0}' has a non-finite initial state")]
    NonFiniteInitialState(String),
    #[error("body '{0}' needs exactly one of `state` or `orbit`")]
    InitialState(String),
    #[error(transparent)]
    Sources(#[from] SourceSetError),
}

/// Fatal conditions that end a run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Collision(#[from] CollisionError),
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("non-finite state for '{body}' after step {step}")]
    ArithmeticDegeneracy { body: String, step: u64 },
    #[error("run cancelled after {step} steps")]
    Cancelled { step: u64 },
    #[error("step observer failed before step {step}: {message}")]
    Observer { step: u64, message: String },
    #[error("simulation already ended in state {0}")]
    Finished(RunState),
}

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Initializing,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl RunState {
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            RunState::Completed | RunState::Failed | RunState::Cancelled
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Initializing => "initializing",
            RunState::Running => "running",
            RunState::Completed => "completed",
            RunState::Failed => "failed",
            RunState::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cooperative cancellation flag, checked once per step.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Sees the body states at the start of every step, before any update.
pub trait StepObserver {
    type Error: std::fmt::Display;

    fn observe(&mut self, step: u64, bodies: &[Body]) -> Result<(), Self::Error>;
}

/// Observer that records nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoObserver;

impl StepObserver for NoObserver {
    type Error = std::convert::Infallible;

    fn observe(&mut self, _step: u64, _bodies: &[Body]) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Distance from the origin and speed of every body, one profile line per step.
impl<W: Write> StepObserver for ProfileSet<W> {
    type Error = ExportError;

    fn observe(&mut self, _step: u64, bodies: &[Body]) -> Result<(), ExportError> {
        self.record(
            bodies
                .iter()
                .map(|body| (body.position.magnitude(), body.speed())),
        )
    }
}

/// Positions of every body at one export tick, already in the output frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub tick: usize,
    pub elapsed_s: f64,
    pub positions: Vec<Vector2>,
}

/// Output of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub body_names: Vec<String>,
    pub dt_s: f64,
    pub export_interval_s: f64,
    pub samples: Vec<Sample>,
}

impl Trajectory {
    /// Write the whitespace-delimited export table.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), ExportError> {
        write_trajectory(
            writer,
            &self.body_names,
            self.export_interval_s,
            self.samples
                .iter()
                .map(|sample| (sample.tick, sample.positions.as_slice())),
        )
    }

    /// Sampled positions of one body, matched case-insensitively by name.
    pub fn positions_of(&self, name: &str) -> Option<Vec<Vector2>> {
        let index = self
            .body_names
            .iter()
            .position(|n| n.eq_ignore_ascii_case(name))?;
        Some(self.samples.iter().map(|s| s.positions[index]).collect())
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }
}

/// Running minimum/maximum of distance from the origin and speed, inertial frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyExtremes {
    pub min_distance_m: f64,
    pub max_distance_m: f64,
    pub min_speed_m_s: f64,
    pub max_speed_m_s: f64,
}

impl BodyExtremes {
    fn starting_at(body: &Body) -> Self {
        let distance = body.position.magnitude();
        let speed = body.speed();
        Self {
            min_distance_m: distance,
            max_distance_m: distance,
            min_speed_m_s: speed,
            max_speed_m_s: speed,
        }
    }

    fn observe(&mut self, body: &Body) {
        let distance = body.position.magnitude();
        let speed = body.speed();
        self.min_distance_m = self.min_distance_m.min(distance);
        self.max_distance_m = self.max_distance_m.max(distance);
        self.min_speed_m_s = self.min_speed_m_s.min(speed);
        self.max_speed_m_s = self.max_speed_m_s.max(speed);
    }
}

/// A single, isolated propagation run.
#[derive(Debug, Clone)]
pub struct Simulation {
    bodies: Vec<Body>,
    sources: SourceSets,
    gravity: NewtonianGravity,
    config: SimulationConfig,
    state: RunState,
    steps: u64,
    total_steps: u64,
    next_export_s: f64,
    samples: Vec<Sample>,
    extremes: Vec<BodyExtremes>,
    failure: Option<SimulationError>,
}

impl Simulation {
    /// Validate inputs and prepare a run. No step is taken yet.
    pub fn new(
        bodies: Vec<Body>,
        sources: SourceSets,
        gravity: NewtonianGravity,
        config: SimulationConfig,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        if bodies.is_empty() {
            return Err(ConfigurationError::NoBodies.into());
        }
        for body in &bodies {
            if !is_valid_body_name(&body.name) {
                return Err(ConfigurationError::InvalidBodyName(body.name.clone()).into());
            }
            if !(body.mass.is_finite() && body.mass >= 0.0) {
                return Err(ConfigurationError::InvalidMass {
                    body: body.name.clone(),
                    mass: body.mass,
                }
                .into());
            }
            if !body.is_finite() {
                return Err(ConfigurationError::NonFiniteInitialState(body.name.clone()).into());
            }
        }
        sources
            .validate(bodies.len())
            .map_err(ConfigurationError::from)?;
        if !(gravity.gravitational_constant.is_finite() && gravity.gravitational_constant > 0.0) {
            return Err(
                ConfigurationError::InvalidGravitationalConstant(gravity.gravitational_constant)
                    .into(),
            );
        }

        let extremes = bodies.iter().map(BodyExtremes::starting_at).collect();
        let total_steps = config.total_steps();
        let expected_samples = ((config.duration_s / config.export_interval_s).ceil() as usize)
            .saturating_add(1)
            .min(MAX_RESERVED_SAMPLES);

        Ok(Self {
            bodies,
            sources,
            gravity,
            config,
            state: RunState::Initializing,
            steps: 0,
            total_steps,
            next_export_s: 0.0,
            samples: Vec::with_capacity(expected_samples),
            extremes,
            failure: None,
        })
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Simulated time accumulated so far, `steps * dt`.
    pub fn elapsed_s(&self) -> f64 {
        self.steps as f64 * self.config.dt_s
    }

    /// Samples captured so far. After a failure these are diagnostics, not a trajectory.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn extremes(&self) -> &[BodyExtremes] {
        &self.extremes
    }

    pub fn failure(&self) -> Option<&SimulationError> {
        self.failure.as_ref()
    }

    /// Advance one step: accelerations for every body from the current positions,
    /// then integration, then an optional sample.
    pub fn step(&mut self) -> Result<RunState, SimulationError> {
        match self.state {
            RunState::Initializing => self.state = RunState::Running,
            RunState::Running => {}
            finished => return Err(SimulationError::Finished(finished)),
        }

        if let Err(err) = accelerate_all(&mut self.bodies, &self.sources, &self.gravity) {
            return Err(self.fail(err.into()));
        }
        integrate_all(&mut self.bodies, self.config.dt_s);

        if let Some(body) = self.bodies.iter().find(|b| !b.is_finite()) {
            let err = SimulationError::ArithmeticDegeneracy {
                body: body.name.clone(),
                step: self.steps,
            };
            return Err(self.fail(err));
        }

        for (extremes, body) in self.extremes.iter_mut().zip(&self.bodies) {
            extremes.observe(body);
        }

        let elapsed = self.elapsed_s();
        if elapsed + BOUNDARY_TOLERANCE * self.config.dt_s >= self.next_export_s {
            self.capture(elapsed);
            self.next_export_s += self.config.export_interval_s;
        }

        self.steps += 1;
        if self.steps >= self.total_steps {
            self.state = RunState::Completed;
        }
        Ok(self.state)
    }

    /// Step until the configured duration is reached.
    pub fn run(&mut self) -> Result<Trajectory, SimulationError> {
        self.run_until_done(None, &mut NoObserver)
    }

    /// Like [`Simulation::run`], checking `token` before every step.
    pub fn run_with_cancel(&mut self, token: &CancelToken) -> Result<Trajectory, SimulationError> {
        self.run_until_done(Some(token), &mut NoObserver)
    }

    /// Like [`Simulation::run`], handing the pre-step states to `observer`. An
    /// observer error fails the run.
    pub fn run_observed<O: StepObserver>(
        &mut self,
        cancel: Option<&CancelToken>,
        observer: &mut O,
    ) -> Result<Trajectory, SimulationError> {
        self.run_until_done(cancel, observer)
    }

    fn run_until_done<O: StepObserver>(
        &mut self,
        cancel: Option<&CancelToken>,
        observer: &mut O,
    ) -> Result<Trajectory, SimulationError> {
        info!(
            bodies = self.bodies.len(),
            dt_s = self.config.dt_s,
            duration_s = self.config.duration_s,
            total_steps = self.total_steps,
            "starting propagation"
        );

        while !self.state.is_finished() {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                self.state = RunState::Cancelled;
                let err = SimulationError::Cancelled { step: self.steps };
                warn!(step = self.steps, "propagation cancelled");
                self.failure = Some(err.clone());
                return Err(err);
            }
            if let Err(err) = observer.observe(self.steps, &self.bodies) {
                let err = SimulationError::Observer {
                    step: self.steps,
                    message: err.to_string(),
                };
                return Err(self.fail(err));
            }
            self.step()?;
        }

        match self.state {
            RunState::Completed => {
                info!(
                    steps = self.steps,
                    samples = self.samples.len(),
                    "propagation completed"
                );
                Ok(self.trajectory())
            }
            other => Err(self
                .failure
                .clone()
                .unwrap_or(SimulationError::Finished(other))),
        }
    }

    /// Summary suitable for the JSON sidecar, valid in any state.
    pub fn summary(&self, scenario: &str) -> RunSummary {
        let bodies = self
            .bodies
            .iter()
            .zip(&self.extremes)
            .map(|(body, extremes)| BodySummary {
                name: body.name.clone(),
                mass_kg: body.mass,
                final_position_m: [body.position.x, body.position.y],
                final_velocity_m_s: [body.velocity.x, body.velocity.y],
                min_distance_m: extremes.min_distance_m,
                max_distance_m: extremes.max_distance_m,
                min_speed_m_s: extremes.min_speed_m_s,
                max_speed_m_s: extremes.max_speed_m_s,
            })
            .collect();

        RunSummary {
            scenario: scenario.to_string(),
            status: self.state.to_string(),
            steps: self.steps,
            dt_s: self.config.dt_s,
            elapsed_s: self.elapsed_s(),
            export_interval_s: self.config.export_interval_s,
            samples: self.samples.len(),
            error: self.failure.as_ref().map(ToString::to_string),
            bodies,
        }
    }

    fn trajectory(&self) -> Trajectory {
        Trajectory {
            body_names: self.bodies.iter().map(|b| b.name.clone()).collect(),
            dt_s: self.config.dt_s,
            export_interval_s: self.config.export_interval_s,
            samples: self.samples.clone(),
        }
    }

    fn capture(&mut self, elapsed_s: f64) {
        let positions = self
            .config
            .frame
            .transform(self.bodies.iter().map(|body| body.position), elapsed_s);
        let tick = self.samples.len();
        trace!(tick, elapsed_s, "sample captured");
        self.samples.push(Sample {
            tick,
            elapsed_s,
            positions,
        });
    }

    fn fail(&mut self, err: SimulationError) -> SimulationError {
        self.state = RunState::Failed;
        warn!(step = self.steps, error = %err, "propagation failed");
        debug!(samples = self.samples.len(), "partial samples retained");
        self.failure = Some(err.clone());
        err
    }
}
