//! Configuration models and loaders for the N-body scenarios.

use std::fs::File;
use std::path::Path;

use nbody_core::constants;
use nbody_core::time::angular_speed_from_period_days;
use serde::Deserialize;
use thiserror::Error;

/// Mass and radius of a massive body.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MassiveBodyConfig {
    pub mass_kg: f64,
    pub radius_m: f64,
}

/// Physical constants and run settings for the Earth–Moon free-return scenario.
///
/// Every field is optional in the manifest; missing values fall back to the defaults.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FreeReturnConfig {
    pub gravitational_constant: f64,
    pub earth: MassiveBodyConfig,
    pub moon: MassiveBodyConfig,
    /// Test-particle mass; negligible next to Earth and Moon.
    pub spacecraft_mass_kg: f64,
    pub earth_moon_distance_m: f64,
    /// Period of the corotating frame (days).
    pub sidereal_month_days: f64,
    pub duration_days: f64,
    pub injection_altitude_km: f64,
    pub export_interval_s: f64,
}

impl FreeReturnConfig {
    /// Angular speed of the Earth–Moon line (rad/s).
    pub fn angular_speed(&self) -> f64 {
        angular_speed_from_period_days(self.sidereal_month_days)
    }
}

impl Default for FreeReturnConfig {
    fn default() -> Self {
        Self {
            gravitational_constant: constants::G,
            earth: MassiveBodyConfig {
                mass_kg: constants::EARTH_MASS_KG,
                radius_m: constants::EARTH_RADIUS_M,
            },
            moon: MassiveBodyConfig {
                mass_kg: constants::MOON_MASS_KG,
                radius_m: constants::MOON_RADIUS_M,
            },
            spacecraft_mass_kg: 1.0,
            earth_moon_distance_m: constants::EARTH_MOON_DISTANCE_M,
            sidereal_month_days: constants::SIDEREAL_MONTH_DAYS,
            duration_days: 10.0,
            injection_altitude_km: 185.0,
            export_interval_s: 50.0,
        }
    }
}

/// Body fixed at the origin of the solar-system scenario.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CentralBodyConfig {
    pub name: String,
    pub mass_kg: f64,
}

/// Explicit heliocentric state vector.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct StateVectorConfig {
    pub position_m: [f64; 2],
    pub velocity_m_s: [f64; 2],
}

/// Circular orbit around the central body.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CircularOrbitConfig {
    pub radius_au: f64,
    #[serde(default)]
    pub phase_deg: f64,
}

/// Planet entry; exactly one of `state` or `orbit` seeds its initial conditions.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OrbitingBodyConfig {
    pub name: String,
    pub mass_kg: f64,
    #[serde(default)]
    pub state: Option<StateVectorConfig>,
    #[serde(default)]
    pub orbit: Option<CircularOrbitConfig>,
}

/// Sun-plus-planets catalog and run settings.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SolarSystemConfig {
    #[serde(default = "default_solar_gravitational_constant")]
    pub gravitational_constant: f64,
    pub step_days: f64,
    pub duration_days: f64,
    /// Export spacing; defaults to one sample per step.
    #[serde(default)]
    pub export_interval_days: Option<f64>,
    pub central: CentralBodyConfig,
    pub bodies: Vec<OrbitingBodyConfig>,
}

fn default_solar_gravitational_constant() -> f64 {
    constants::G_SOLAR_SYSTEM
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Load free-return settings from a YAML or TOML file.
pub fn load_free_return<P: AsRef<Path>>(path: P) -> Result<FreeReturnConfig, ConfigError> {
    load_document(path)
}

/// Load a solar-system catalog from a YAML or TOML file.
pub fn load_solar_system<P: AsRef<Path>>(path: P) -> Result<SolarSystemConfig, ConfigError> {
    load_document(path)
}

/// Parse a free-return manifest from YAML text.
pub fn free_return_from_yaml(text: &str) -> Result<FreeReturnConfig, ConfigError> {
    Ok(serde_yaml::from_str(text)?)
}

/// Parse a solar-system manifest from YAML text.
pub fn solar_system_from_yaml(text: &str) -> Result<SolarSystemConfig, ConfigError> {
    Ok(serde_yaml::from_str(text)?)
}

fn load_document<T, P>(path: P) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}
