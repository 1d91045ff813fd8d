//! Closed-form initial conditions for the shipped scenarios.

pub mod free_return;
pub mod solar_system;
