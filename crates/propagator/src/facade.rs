//! Re-exported APIs for consumers of the propagator crate.

pub use crate::scenario::free_return::InjectionParams;
pub use crate::simulation::{
    BodyExtremes, CancelToken, ConfigurationError, Frame, NoObserver, RunState, Sample,
    Simulation, SimulationConfig, SimulationError, StepObserver, Trajectory,
};
pub use crate::sweep::{SweepAxis, SweepAxisError, SweepOutcome, run_one, run_sweep};
pub use nbody_dynamics::{Body, CollisionError, NewtonianGravity, SourceSets};
