//! Mutable point-mass state and the per-step update passes.

use nbody_core::Vector2;

use crate::gravity::{CollisionError, NewtonianGravity};
use crate::sources::SourceSets;

/// A point mass in the plane. Units: kg, m, m/s, m/s².
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub name: String,
    pub mass: f64,
    pub position: Vector2,
    pub velocity: Vector2,
    pub acceleration: Vector2,
}

impl Body {
    pub fn new(name: impl Into<String>, mass: f64, position: Vector2, velocity: Vector2) -> Self {
        Self {
            name: name.into(),
            mass,
            position,
            velocity,
            acceleration: Vector2::ZERO,
        }
    }

    /// Overwrite the acceleration with the pull of `sources`.
    pub fn update_acceleration<'a, I>(
        &mut self,
        gravity: &NewtonianGravity,
        sources: I,
    ) -> Result<(), CollisionError>
    where
        I: IntoIterator<Item = &'a Body>,
    {
        self.acceleration = gravity.acceleration(self, sources)?;
        Ok(())
    }

    /// Semi-implicit Euler step: velocity first, then position from the new velocity.
    pub fn update_state(&mut self, dt: f64) {
        self.velocity += self.acceleration * dt;
        self.position += self.velocity * dt;
    }

    pub fn speed(&self) -> f64 {
        self.velocity.magnitude()
    }

    pub fn momentum(&self) -> Vector2 {
        self.velocity * self.mass
    }

    /// True when position, velocity and acceleration hold only finite values.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite() && self.acceleration.is_finite()
    }
}

/// Recompute every body's acceleration from the current positions.
///
/// Positions are not touched, so the result does not depend on body order.
pub fn accelerate_all(
    bodies: &mut [Body],
    sources: &SourceSets,
    gravity: &NewtonianGravity,
) -> Result<(), CollisionError> {
    for index in 0..bodies.len() {
        let acceleration = gravity.acceleration(
            &bodies[index],
            sources.sources_of(index).iter().map(|&source| &bodies[source]),
        )?;
        bodies[index].acceleration = acceleration;
    }
    Ok(())
}

/// Advance every body by `dt` using its current acceleration.
pub fn integrate_all(bodies: &mut [Body], dt: f64) {
    for body in bodies.iter_mut() {
        body.update_state(dt);
    }
}
