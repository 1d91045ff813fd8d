//! Fixed-timestep N-body propagation with scenario builders and sweep drivers.

pub mod scenario;
pub mod simulation;
pub mod sweep;

pub use facade::*;

mod facade;
