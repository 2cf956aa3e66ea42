use serde::{Deserialize, Serialize};

use crate::error::InvalidLevel;

/// Temperature the Tx channel starts at, in degrees Celsius.
pub const DEFAULT_TEMPERATURE_CELSIUS: f64 = 25.0;

/// The state of a binary channel.
///
/// Serialized as the integer `0` or `1`, so a level can only ever hold one of
/// those two values.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(into = "u8", try_from = "i64")]
pub enum Level {
    #[default]
    Low,
    High,
}

impl Level {
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::High => 1,
        }
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.as_u8()
    }
}

impl TryFrom<i64> for Level {
    type Error = InvalidLevel;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Low),
            1 => Ok(Self::High),
            other => Err(InvalidLevel(other)),
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// A snapshot of all five simulated channels.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct DeviceReading {
    /// Binary input A.
    #[serde(rename = "A")]
    pub a: Level,

    /// Binary input B.
    #[serde(rename = "B")]
    pub b: Level,

    /// Digital output 1.
    #[serde(rename = "DO1")]
    pub do1: Level,

    /// Digital output 2.
    #[serde(rename = "DO2")]
    pub do2: Level,

    /// Temperature in degrees Celsius. Not clamped.
    #[serde(rename = "Tx")]
    pub tx: f64,
}

impl DeviceReading {
    /// A reading with every binary channel low and Tx at `tx`.
    pub fn with_temperature(tx: f64) -> Self {
        Self {
            a: Level::Low,
            b: Level::Low,
            do1: Level::Low,
            do2: Level::Low,
            tx,
        }
    }

    /// The Tx channel converted to degrees Fahrenheit.
    pub fn tx_fahrenheit(&self) -> f64 {
        self.tx * 9.0 / 5.0 + 32.0
    }
}

impl Default for DeviceReading {
    fn default() -> Self {
        Self::with_temperature(DEFAULT_TEMPERATURE_CELSIUS)
    }
}

impl std::fmt::Display for DeviceReading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "A={} B={} DO1={} DO2={} Tx={:.2} °C",
            self.a, self.b, self.do1, self.do2, self.tx
        )
    }
}

#[test]
fn test_default_reading() {
    let reading = DeviceReading::default();

    assert_eq!(reading.a, Level::Low);
    assert_eq!(reading.do2, Level::Low);
    assert_eq!(reading.tx, 25.0);
    assert_eq!(reading.tx_fahrenheit(), 77.0);
}

#[test]
fn test_level_rejects_non_binary_values() {
    assert_eq!(Level::try_from(1i64), Ok(Level::High));
    assert_eq!(Level::try_from(2i64), Err(InvalidLevel(2)));
    assert_eq!(Level::try_from(-1i64), Err(InvalidLevel(-1)));
}

#[test]
fn test_reading_serializes_with_channel_names() {
    let reading = DeviceReading {
        a: Level::High,
        tx: 21.5,
        ..DeviceReading::default()
    };

    let json = serde_json::to_value(reading).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"A": 1, "B": 0, "DO1": 0, "DO2": 0, "Tx": 21.5})
    );

    let invalid = r#"{"A": 3, "B": 0, "DO1": 0, "DO2": 0, "Tx": 21.5}"#;
    assert!(serde_json::from_str::<DeviceReading>(invalid).is_err());
}
