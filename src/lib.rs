//! Gravitational N-body trajectory propagation.
//!
//! The workspace crates are re-exported here so front-ends (CLI, notebooks, plot
//! scripts driving the binaries) share one entry point: planar primitives, point-mass
//! dynamics, scenario configuration, the fixed-timestep driver, and the export format.

pub use nbody_config as config;
pub use nbody_core::{Rotation2, Vector2, constants, rotation, time, units, vector};
pub use nbody_dynamics as dynamics;
pub use nbody_export as export;
pub use nbody_orbits as orbits;
pub use nbody_propagator as propagator;
