//! Closed-form two-body helpers (barycenter offsets, circular speeds, periods).
use nbody_core::Vector2;

/// Distance from the body of mass `m1` to the barycenter of a pair separated by `d`.
///
/// Equivalent to `d * m2 / (m1 + m2)`: the heavier body sits closer to the barycenter.
pub fn barycenter_distance(d: f64, m1: f64, m2: f64) -> f64 {
    d * m2 / (m1 + m2)
}

/// Circular orbital speed at `distance` around a central mass with gravitational
/// parameter `mu` (m³/s²).
pub fn circular_speed(mu: f64, distance: f64) -> f64 {
    (mu / distance.abs()).sqrt()
}

/// Keplerian period of an orbit with semi-major axis `a` around `mu`.
pub fn orbital_period(mu: f64, a: f64) -> f64 {
    2.0 * std::f64::consts::PI * (a.powi(3) / mu).sqrt()
}

/// Initial state of a body on a circular orbit of radius `radius` around a central body
/// resting at `center`, placed at polar angle `phase` (rad). Motion is prograde.
pub fn circular_state(center: &Vector2, mu: f64, radius: f64, phase: f64) -> (Vector2, Vector2) {
    let position = *center + Vector2::from_polar(radius, phase);
    let velocity = Vector2::from_polar(
        circular_speed(mu, radius),
        phase + std::f64::consts::FRAC_PI_2,
    );
    (position, velocity)
}
