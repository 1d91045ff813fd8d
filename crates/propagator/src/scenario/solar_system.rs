//! Sun-plus-planets scenario seeded from a catalog of state vectors or circular orbits.

use nbody_config::{OrbitingBodyConfig, SolarSystemConfig};
use nbody_core::Vector2;
use nbody_core::time::days_to_seconds;
use nbody_core::units::{au_to_m, deg_to_rad};
use nbody_dynamics::{Body, NewtonianGravity, SourceSets};
use nbody_orbits::circular_state;

use crate::simulation::{ConfigurationError, Frame, Simulation, SimulationConfig, SimulationError};

pub const SCENARIO_NAME: &str = "solar_system";

/// Central body at rest at the origin, followed by the catalog bodies in order.
pub fn initial_bodies(config: &SolarSystemConfig) -> Result<Vec<Body>, ConfigurationError> {
    let mu_central = config.gravitational_constant * config.central.mass_kg;
    let mut bodies = Vec::with_capacity(1 + config.bodies.len());
    bodies.push(Body::new(
        config.central.name.clone(),
        config.central.mass_kg,
        Vector2::ZERO,
        Vector2::ZERO,
    ));
    for entry in &config.bodies {
        let (position, velocity) = initial_state(entry, mu_central)?;
        bodies.push(Body::new(entry.name.clone(), entry.mass_kg, position, velocity));
    }
    Ok(bodies)
}

fn initial_state(
    entry: &OrbitingBodyConfig,
    mu_central: f64,
) -> Result<(Vector2, Vector2), ConfigurationError> {
    match (&entry.state, &entry.orbit) {
        (Some(state), None) => Ok((
            Vector2::new(state.position_m[0], state.position_m[1]),
            Vector2::new(state.velocity_m_s[0], state.velocity_m_s[1]),
        )),
        (None, Some(orbit)) => Ok(circular_state(
            &Vector2::ZERO,
            mu_central,
            au_to_m(orbit.radius_au),
            deg_to_rad(orbit.phase_deg),
        )),
        _ => Err(ConfigurationError::InitialState(entry.name.clone())),
    }
}

/// Inertial-frame timing; one sample per step unless the catalog says otherwise.
pub fn simulation_config(config: &SolarSystemConfig) -> SimulationConfig {
    let dt_s = days_to_seconds(config.step_days);
    SimulationConfig {
        dt_s,
        duration_s: days_to_seconds(config.duration_days),
        export_interval_s: config
            .export_interval_days
            .map(days_to_seconds)
            .unwrap_or(dt_s),
        frame: Frame::Inertial,
    }
}

pub fn build(config: &SolarSystemConfig) -> Result<Simulation, SimulationError> {
    let bodies = initial_bodies(config)?;
    let sources = SourceSets::complete(bodies.len());
    Simulation::new(
        bodies,
        sources,
        NewtonianGravity::new(config.gravitational_constant),
        simulation_config(config),
    )
}
