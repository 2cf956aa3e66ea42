//! The simulated TekX device: its reading, how the reading evolves, and the
//! multi-day trends observed from it.

mod config;
mod error;
mod reading;
mod state;
mod trend;

pub use config::{SimulatorConfig, DEFAULT_TREND_DAYS, MAX_TREND_DAYS};
pub use error::{ConfigError, ConfigureError, InvalidLevel};
pub use reading::{DeviceReading, Level, DEFAULT_TEMPERATURE_CELSIUS};
pub use state::DeviceState;
pub use trend::{Trend, TrendRecord, TIMESTAMP_FORMAT};
