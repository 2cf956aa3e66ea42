use core::fmt;

/// A value other than `0` or `1` was offered for a binary channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidLevel(pub i64);

impl fmt::Display for InvalidLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not a binary level (expected 0 or 1)", self.0)
    }
}

impl std::error::Error for InvalidLevel {}

/// Errors returned by [`crate::DeviceState::configure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigureError {
    /// `channel` was given `value`, which is neither 0 nor 1.
    InvalidConfigurationValue { channel: &'static str, value: i64 },
}

impl fmt::Display for ConfigureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfigurationValue { channel, value } => {
                write!(f, "invalid value {value} for {channel}, enter 0 or 1")
            }
        }
    }
}

impl std::error::Error for ConfigureError {}

/// Errors found while loading a [`crate::SimulatorConfig`].
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    InitialTemperature(f64),
    TemperatureDrift(f64),
    TrendDays(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "config: {e}"),
            Self::InitialTemperature(t) => write!(f, "config: initial temperature {t} is not finite"),
            Self::TemperatureDrift(d) => {
                write!(f, "config: temperature drift {d} must be greater than zero and small enough to double")
            }
            Self::TrendDays(days) => {
                write!(f, "config: trend length {days} exceeds {} days", crate::MAX_TREND_DAYS)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}
