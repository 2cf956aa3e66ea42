use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::reading::DEFAULT_TEMPERATURE_CELSIUS;

/// Number of daily records in a trend unless asked otherwise.
pub const DEFAULT_TREND_DAYS: usize = 7;

/// Longest trend the device will produce, about a century.
pub const MAX_TREND_DAYS: usize = 36_500;

/// Constants driving the simulation.
///
/// Deserializing always goes through [`SimulatorConfig::validate`], so a config
/// that exists is one the simulator can run with.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(try_from = "RawConfig")]
pub struct SimulatorConfig {
    /// Tx of a freshly created device, in degrees Celsius.
    initial_temperature: f64,

    /// Each perturbation moves Tx by a value in `[-drift, drift)`.
    temperature_drift: f64,

    /// Length of a trend when none is given.
    trend_days: usize,
}

#[derive(Deserialize)]
#[serde(default)]
struct RawConfig {
    initial_temperature: f64,
    temperature_drift: f64,
    trend_days: usize,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            initial_temperature: DEFAULT_TEMPERATURE_CELSIUS,
            temperature_drift: 1.0,
            trend_days: DEFAULT_TREND_DAYS,
        }
    }
}

impl TryFrom<RawConfig> for SimulatorConfig {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        Self::new(raw.initial_temperature, raw.temperature_drift, raw.trend_days)
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        let raw = RawConfig::default();
        Self {
            initial_temperature: raw.initial_temperature,
            temperature_drift: raw.temperature_drift,
            trend_days: raw.trend_days,
        }
    }
}

impl SimulatorConfig {
    pub fn new(
        initial_temperature: f64,
        temperature_drift: f64,
        trend_days: usize,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            initial_temperature,
            temperature_drift,
            trend_days,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parses a JSON document. Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config = serde_json::from_str::<Self>(json)?;
        log::debug!("Loaded simulator config: {config:?}");
        Ok(config)
    }

    /// The configuration shipped with the crate.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_json(std::include_str!("./defaults.json"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.initial_temperature.is_finite() {
            return Err(ConfigError::InitialTemperature(self.initial_temperature));
        }
        // The sampled range spans twice the drift and must stay finite.
        let span = 2.0 * self.temperature_drift;
        if !span.is_finite() || self.temperature_drift <= 0.0 {
            return Err(ConfigError::TemperatureDrift(self.temperature_drift));
        }
        if self.trend_days > MAX_TREND_DAYS {
            return Err(ConfigError::TrendDays(self.trend_days));
        }
        Ok(())
    }

    pub fn initial_temperature(&self) -> f64 {
        self.initial_temperature
    }

    pub fn temperature_drift(&self) -> f64 {
        self.temperature_drift
    }

    pub fn trend_days(&self) -> usize {
        self.trend_days
    }
}

#[test]
fn test_embedded_config_matches_default() {
    let config = SimulatorConfig::embedded().unwrap();

    assert_eq!(config, SimulatorConfig::default());
    assert_eq!(config.initial_temperature(), 25.0);
    assert_eq!(config.trend_days(), 7);
}

#[test]
fn test_large_drift_still_perturbs() {
    use rand::{rngs::StdRng, SeedableRng};

    let config = SimulatorConfig::new(25.0, 1e300, 7).unwrap();
    let mut state = crate::DeviceState::with_rng(config, StdRng::seed_from_u64(1));

    state.perturb();
    assert!(state.current().tx.is_finite());
}

#[test]
fn test_partial_config_uses_defaults() {
    let config = SimulatorConfig::from_json(r#"{ "trend_days": 14 }"#).unwrap();

    assert_eq!(config.trend_days(), 14);
    assert_eq!(config.temperature_drift(), 1.0);
}

#[test]
fn test_invalid_drift_is_rejected() {
    let result = SimulatorConfig::from_json(r#"{ "temperature_drift": 0.0 }"#);
    assert!(result.is_err());

    assert!(matches!(
        SimulatorConfig::new(25.0, -1.0, 7),
        Err(ConfigError::TemperatureDrift(_))
    ));
    assert!(matches!(
        SimulatorConfig::from_json(r#"{ "temperature_drift": 1e308 }"#),
        Err(ConfigError::TemperatureDrift(_))
    ));
    assert!(matches!(
        SimulatorConfig::new(25.0, f64::MAX, 7),
        Err(ConfigError::TemperatureDrift(_))
    ));
    assert!(matches!(
        SimulatorConfig::new(25.0, 1.0, MAX_TREND_DAYS + 1),
        Err(ConfigError::TrendDays(_))
    ));
    assert!(matches!(
        SimulatorConfig::new(f64::NAN, 1.0, 7),
        Err(ConfigError::InitialTemperature(_))
    ));
}
