//! Earth–Moon free-return scenario: Earth and Moon on circular orbits about their
//! barycenter, a test-particle spacecraft injected from a low Earth parking orbit.

use std::f64::consts::FRAC_PI_2;

use nbody_config::FreeReturnConfig;
use nbody_core::Vector2;
use nbody_core::time::days_to_seconds;
use nbody_core::units::{deg_to_rad, km_to_m};
use nbody_dynamics::{Body, NewtonianGravity, SourceSets};
use nbody_orbits::{barycenter_distance, circular_speed};

use crate::simulation::{Frame, Simulation, SimulationConfig, SimulationError};

pub const EARTH: usize = 0;
pub const MOON: usize = 1;
pub const SPACECRAFT: usize = 2;

pub const SCENARIO_NAME: &str = "free_return";

/// Trans-lunar injection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InjectionParams {
    /// Polar angle of the injection point around Earth (degrees).
    pub angle_deg: f64,
    /// Speed added on top of the local circular speed (m/s).
    pub delta_v_m_s: f64,
    pub steps_per_second: f64,
}

/// Earth, Moon and spacecraft at `t = 0`, in that order.
pub fn initial_bodies(config: &FreeReturnConfig, injection: &InjectionParams) -> Vec<Body> {
    let distance = config.earth_moon_distance_m;
    let earth_mass = config.earth.mass_kg;
    let moon_mass = config.moon.mass_kg;
    let omega = config.angular_speed();
    let angle = deg_to_rad(injection.angle_deg);

    let earth_position = Vector2::new(-barycenter_distance(distance, earth_mass, moon_mass), 0.0);
    let moon_position = Vector2::new(barycenter_distance(distance, moon_mass, earth_mass), 0.0);
    let parking_radius = config.earth.radius_m + km_to_m(config.injection_altitude_km);
    let spacecraft_position = earth_position + Vector2::from_polar(parking_radius, angle);

    let earth_velocity = Vector2::from_polar(earth_position.magnitude() * omega, -FRAC_PI_2);
    let moon_velocity = Vector2::from_polar(moon_position.magnitude() * omega, FRAC_PI_2);
    let mu_earth = config.gravitational_constant * earth_mass;
    let parking_distance = (spacecraft_position - earth_position).magnitude();
    let injection_speed = circular_speed(mu_earth, parking_distance) + injection.delta_v_m_s;
    let spacecraft_velocity = Vector2::from_polar(injection_speed, angle + FRAC_PI_2);

    vec![
        Body::new("Earth", earth_mass, earth_position, earth_velocity),
        Body::new("Moon", moon_mass, moon_position, moon_velocity),
        Body::new(
            "Spacecraft",
            config.spacecraft_mass_kg,
            spacecraft_position,
            spacecraft_velocity,
        ),
    ]
}

/// Earth and Moon pull on each other; both pull on the spacecraft, which pulls on nothing.
pub fn source_sets() -> SourceSets {
    SourceSets::excluding_test_particles(3, &[SPACECRAFT])
}

/// Timing for the scenario, sampled in the Earth–Moon corotating frame.
pub fn simulation_config(config: &FreeReturnConfig, steps_per_second: f64) -> SimulationConfig {
    SimulationConfig::from_steps_per_second(
        steps_per_second,
        days_to_seconds(config.duration_days),
        config.export_interval_s,
        Frame::Rotating {
            angular_speed: config.angular_speed(),
        },
    )
}

pub fn build(
    config: &FreeReturnConfig,
    injection: &InjectionParams,
) -> Result<Simulation, SimulationError> {
    Simulation::new(
        initial_bodies(config, injection),
        source_sets(),
        NewtonianGravity::new(config.gravitational_constant),
        simulation_config(config, injection.steps_per_second),
    )
}

/// Export file name for a run, e.g. `out_-123.7_3150.0.txt`.
pub fn output_file_name(injection: &InjectionParams) -> String {
    format!(
        "out_{:?}_{:?}.txt",
        injection.angle_deg, injection.delta_v_m_s
    )
}
