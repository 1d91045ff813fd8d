//! Core units, constants, and 2D primitives for the N-body trajectory workspace.

/// Physical constants expressed in SI units (unless stated otherwise).
pub mod constants {
    /// Gravitational constant used by the lunar free-return scenario (m³ kg⁻¹ s⁻²).
    pub const G: f64 = 6.674_08e-11;
    /// Gravitational constant used by the solar-system catalog (m³ kg⁻¹ s⁻²).
    pub const G_SOLAR_SYSTEM: f64 = 6.674_28e-11;
    /// Metres per astronomical unit.
    pub const AU_M: f64 = 149.6e9;
    /// Seconds per day.
    pub const SECONDS_PER_DAY: f64 = 86_400.0;

    pub const EARTH_MASS_KG: f64 = 5.972_37e24;
    pub const EARTH_RADIUS_M: f64 = 6.378e6;
    pub const MOON_MASS_KG: f64 = 7.342e22;
    pub const MOON_RADIUS_M: f64 = 1.737e6;
    /// Mean Earth–Moon distance (m).
    pub const EARTH_MOON_DISTANCE_M: f64 = 3.844_02e8;
    /// Sidereal month used for the corotating frame (days).
    pub const SIDEREAL_MONTH_DAYS: f64 = 27.3;
}

/// Basic unit conversion helpers.
pub mod units {
    use super::constants::AU_M;

    /// Convert kilometres to metres.
    #[inline]
    pub fn km_to_m(v: f64) -> f64 {
        v * 1_000.0
    }

    #[inline]
    pub fn au_to_m(v: f64) -> f64 {
        v * AU_M
    }

    #[inline]
    pub fn m_to_au(v: f64) -> f64 {
        v / AU_M
    }

    /// Convert degrees to radians.
    #[inline]
    pub fn deg_to_rad(angle: f64) -> f64 {
        angle * std::f64::consts::PI / 180.0
    }
}

/// Lightweight time utilities shared across crates.
pub mod time {
    use super::constants::SECONDS_PER_DAY;

    /// Convert days to seconds.
    #[inline]
    pub fn days_to_seconds(days: f64) -> f64 {
        days * SECONDS_PER_DAY
    }

    /// Convert seconds to days.
    #[inline]
    pub fn seconds_to_days(seconds: f64) -> f64 {
        seconds / SECONDS_PER_DAY
    }

    /// Angular speed (rad/s) of a body completing one revolution in `period_days`.
    #[inline]
    pub fn angular_speed_from_period_days(period_days: f64) -> f64 {
        2.0 * std::f64::consts::PI / days_to_seconds(period_days)
    }
}

/// Planar vector value type used for positions, velocities and accelerations.
pub mod vector {
    use std::ops::{Add, AddAssign, Mul, Neg, Sub};

    use super::rotation::Rotation2;

    /// Immutable 2D vector in metres, m/s or m/s² depending on context.
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct Vector2 {
        pub x: f64,
        pub y: f64,
    }

    impl Vector2 {
        pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

        #[inline]
        pub const fn new(x: f64, y: f64) -> Self {
            Self { x, y }
        }

        /// Build a vector from a magnitude and an angle in radians.
        #[inline]
        pub fn from_polar(magnitude: f64, angle: f64) -> Self {
            Self {
                x: magnitude * angle.cos(),
                y: magnitude * angle.sin(),
            }
        }

        /// Euclidean norm.
        #[inline]
        pub fn magnitude(&self) -> f64 {
            (self.x * self.x + self.y * self.y).sqrt()
        }

        /// Polar angle in radians, `atan2(y, x)`.
        #[inline]
        pub fn angle(&self) -> f64 {
            self.y.atan2(self.x)
        }

        #[inline]
        pub fn rotate(&self, r: &Rotation2) -> Self {
            let m = &r.matrix;
            Self {
                x: m[0][0] * self.x + m[0][1] * self.y,
                y: m[1][0] * self.x + m[1][1] * self.y,
            }
        }

        #[inline]
        pub fn is_finite(&self) -> bool {
            self.x.is_finite() && self.y.is_finite()
        }
    }

    /// Vector addition.
    #[inline]
    pub fn add(a: &Vector2, b: &Vector2) -> Vector2 {
        Vector2::new(a.x + b.x, a.y + b.y)
    }

    /// Vector subtraction.
    #[inline]
    pub fn sub(a: &Vector2, b: &Vector2) -> Vector2 {
        Vector2::new(a.x - b.x, a.y - b.y)
    }

    /// Scale a vector by a scalar.
    #[inline]
    pub fn scale(v: &Vector2, s: f64) -> Vector2 {
        Vector2::new(v.x * s, v.y * s)
    }

    impl Add for Vector2 {
        type Output = Vector2;

        #[inline]
        fn add(self, rhs: Vector2) -> Vector2 {
            add(&self, &rhs)
        }
    }

    impl AddAssign for Vector2 {
        #[inline]
        fn add_assign(&mut self, rhs: Vector2) {
            self.x += rhs.x;
            self.y += rhs.y;
        }
    }

    impl Sub for Vector2 {
        type Output = Vector2;

        #[inline]
        fn sub(self, rhs: Vector2) -> Vector2 {
            sub(&self, &rhs)
        }
    }

    impl Mul<f64> for Vector2 {
        type Output = Vector2;

        #[inline]
        fn mul(self, rhs: f64) -> Vector2 {
            scale(&self, rhs)
        }
    }

    impl Neg for Vector2 {
        type Output = Vector2;

        #[inline]
        fn neg(self) -> Vector2 {
            Vector2::new(-self.x, -self.y)
        }
    }
}

/// Planar rotations used for reference-frame transforms.
pub mod rotation {
    /// Row-major 2×2 rotation matrix.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Rotation2 {
        pub matrix: [[f64; 2]; 2],
    }

    impl Rotation2 {
        pub const IDENTITY: Rotation2 = Rotation2 {
            matrix: [[1.0, 0.0], [0.0, 1.0]],
        };

        /// Counter-clockwise rotation by `alpha` radians.
        pub fn from_angle(alpha: f64) -> Self {
            let (sin, cos) = alpha.sin_cos();
            Self {
                matrix: [[cos, -sin], [sin, cos]],
            }
        }
    }

    impl Default for Rotation2 {
        fn default() -> Self {
            Self::IDENTITY
        }
    }
}

pub use rotation::Rotation2;
pub use vector::Vector2;
