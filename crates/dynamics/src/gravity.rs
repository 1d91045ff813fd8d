//! Newtonian gravity accumulation between point masses.

use nbody_core::Vector2;
use thiserror::Error;

use crate::body::Body;

/// Two distinct bodies occupy the same position, so their mutual pull is undefined.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("collision between '{body}' and '{other}': zero separation")]
pub struct CollisionError {
    pub body: String,
    pub other: String,
}

/// Inverse-square point-mass gravity with a configurable gravitational constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonianGravity {
    pub gravitational_constant: f64,
}

impl NewtonianGravity {
    pub fn new(gravitational_constant: f64) -> Self {
        Self {
            gravitational_constant,
        }
    }

    /// Acceleration induced on `target` by a single `source`.
    ///
    /// Magnitude is `G * m_source / d²`; the target's own mass never enters. The
    /// direction is taken from `atan2` of the separation vector.
    pub fn acceleration_from(
        &self,
        target: &Body,
        source: &Body,
    ) -> Result<Vector2, CollisionError> {
        let separation = source.position - target.position;
        let distance = separation.magnitude();
        if distance == 0.0 {
            return Err(CollisionError {
                body: target.name.clone(),
                other: source.name.clone(),
            });
        }
        let magnitude = self.gravitational_constant * source.mass / (distance * distance);
        Ok(Vector2::from_polar(magnitude, separation.angle()))
    }

    /// Total acceleration on `target` from every body in `sources`.
    ///
    /// A body is never its own source: if `target` itself shows up in `sources` it is skipped.
    pub fn acceleration<'a, I>(&self, target: &Body, sources: I) -> Result<Vector2, CollisionError>
    where
        I: IntoIterator<Item = &'a Body>,
    {
        let mut total = Vector2::ZERO;
        for source in sources {
            if std::ptr::eq(source, target) {
                continue;
            }
            total += self.acceleration_from(target, source)?;
        }
        Ok(total)
    }

    /// Force (N) exerted on `a` by `b`.
    pub fn pairwise_force(&self, a: &Body, b: &Body) -> Result<Vector2, CollisionError> {
        Ok(self.acceleration_from(a, b)? * a.mass)
    }
}
