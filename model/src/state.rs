use chrono::{Local, NaiveDateTime, TimeDelta};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{SimulatorConfig, MAX_TREND_DAYS};
use crate::error::ConfigureError;
use crate::reading::{DeviceReading, Level};
use crate::trend::{Trend, TrendRecord};

/// The simulated TekX device.
///
/// Holds the current [`DeviceReading`] and the random source used to evolve
/// it. Every mutation takes `&mut self`; wrap the state in a mutex to share it
/// between threads.
pub struct DeviceState<R = StdRng> {
    reading: DeviceReading,
    config: SimulatorConfig,
    rng: R,
}

impl DeviceState<StdRng> {
    /// A device with the default configuration, seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(SimulatorConfig::default(), StdRng::from_entropy())
    }

    /// A device whose random walk is reproducible from `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(SimulatorConfig::default(), StdRng::seed_from_u64(seed))
    }

    pub fn from_config(config: SimulatorConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl Default for DeviceState<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> DeviceState<R> {
    pub fn with_rng(config: SimulatorConfig, rng: R) -> Self {
        Self {
            reading: DeviceReading::with_temperature(config.initial_temperature()),
            config,
            rng,
        }
    }

    /// The present reading.
    pub fn current(&self) -> DeviceReading {
        self.reading
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Resamples every binary channel and nudges Tx by a random delta.
    pub fn perturb(&mut self) {
        let drift = self.config.temperature_drift();
        let delta = self.rng.gen_range(-drift..drift);

        self.reading = DeviceReading {
            a: Level::from(self.rng.gen_bool(0.5)),
            b: Level::from(self.rng.gen_bool(0.5)),
            do1: Level::from(self.rng.gen_bool(0.5)),
            do2: Level::from(self.rng.gen_bool(0.5)),
            tx: self.reading.tx + delta,
        };

        log::debug!("Perturbed device: {}", self.reading);
    }

    /// Overwrites inputs A and B. DO1, DO2 and Tx are left alone.
    ///
    /// Both values must be `0` or `1`; otherwise nothing changes.
    pub fn configure(&mut self, a: i64, b: i64) -> Result<(), ConfigureError> {
        let a = Level::try_from(a).map_err(|e| invalid("A", e.0))?;
        let b = Level::try_from(b).map_err(|e| invalid("B", e.0))?;

        self.reading.a = a;
        self.reading.b = b;

        log::debug!("Configured A={a} B={b}");
        Ok(())
    }

    /// Restores the configured initial reading.
    pub fn reset(&mut self) {
        self.reading = DeviceReading::with_temperature(self.config.initial_temperature());
    }

    /// A trend of the configured default length, starting now.
    pub fn observe_week(&mut self) -> Trend {
        self.observe_trend(self.config.trend_days())
    }

    /// A trend of `days` records, starting now on the local wall clock.
    ///
    /// `days` is capped at [`MAX_TREND_DAYS`].
    pub fn observe_trend(&mut self, days: usize) -> Trend {
        self.observe_trend_from(Local::now().naive_local(), days)
    }

    /// Builds `days` records going back one calendar day at a time from `now`.
    ///
    /// The first record is the current reading. Every later record is taken
    /// after one [`perturb`](Self::perturb), so the device ends up holding the
    /// reading of the oldest record. Timestamps are local wall-clock times and
    /// keep the same time of day across daylight saving changes.
    ///
    /// Requests longer than [`MAX_TREND_DAYS`] are cut to that length.
    pub fn observe_trend_from(&mut self, now: NaiveDateTime, days: usize) -> Trend {
        if days > MAX_TREND_DAYS {
            log::warn!("Trend of {days} days requested, observing {MAX_TREND_DAYS}");
        }
        let days = days.min(MAX_TREND_DAYS);
        let mut timestamp = now;

        let trend = (0..days)
            .map(|day| {
                if day > 0 {
                    timestamp -= TimeDelta::days(1);
                    self.perturb();
                }
                TrendRecord {
                    timestamp,
                    reading: self.reading,
                }
            })
            .collect::<Trend>();

        log::info!("Observed trend over {} days", trend.len());
        trend
    }
}

fn invalid(channel: &'static str, value: i64) -> ConfigureError {
    log::warn!("Rejected configuration {channel}={value}");
    ConfigureError::InvalidConfigurationValue { channel, value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn is_binary(level: Level) -> bool {
        matches!(level.as_u8(), 0 | 1)
    }

    #[test]
    fn test_new_device_reads_defaults() {
        let state = DeviceState::seeded(1);

        assert_eq!(state.current(), DeviceReading::default());
    }

    #[test]
    fn test_configure_invalid_names_channel() {
        let mut state = DeviceState::seeded(1);

        assert_eq!(
            state.configure(0, 7),
            Err(ConfigureError::InvalidConfigurationValue { channel: "B", value: 7 })
        );
        assert_eq!(
            state.configure(-1, 1),
            Err(ConfigureError::InvalidConfigurationValue { channel: "A", value: -1 })
        );
    }

    #[test]
    fn test_perturb_keeps_levels_binary() {
        let mut state = DeviceState::seeded(42);

        for n in 1..=1000 {
            state.perturb();
            let reading = state.current();

            assert!(is_binary(reading.a) && is_binary(reading.b));
            assert!(is_binary(reading.do1) && is_binary(reading.do2));
            assert!(reading.tx.is_finite());
            assert!((reading.tx - 25.0).abs() <= n as f64);
        }
    }

    #[test]
    fn test_same_seed_same_walk() {
        let mut first = DeviceState::seeded(7);
        let mut second = DeviceState::seeded(7);

        for _ in 0..20 {
            first.perturb();
            second.perturb();
            assert_eq!(first.current(), second.current());
        }
    }

    #[test]
    fn test_observe_trend_steps_back_one_day() {
        let mut state = DeviceState::seeded(3);
        let before = state.current();
        let trend = state.observe_trend(7);

        assert_eq!(trend.len(), 7);
        assert_eq!(trend.records()[0].reading, before);

        let now = Local::now().naive_local();
        assert!((now - trend.records()[0].timestamp).num_seconds() <= 1);

        for pair in trend.records().windows(2) {
            assert_eq!(pair[0].timestamp - pair[1].timestamp, TimeDelta::days(1));
        }
    }

    #[test]
    fn test_observe_trend_leaves_oldest_reading() {
        let mut state = DeviceState::seeded(11);
        let trend = state.observe_week();

        assert_eq!(trend.len(), 7);
        assert_eq!(state.current(), trend.last().unwrap().reading);
    }

    #[test]
    fn test_observe_trend_edge_lengths() {
        let mut state = DeviceState::seeded(5);
        state.configure(1, 1).unwrap();
        let before = state.current();

        assert!(state.observe_trend(0).is_empty());
        assert_eq!(state.current(), before);

        let single = state.observe_trend(1);
        assert_eq!(single.len(), 1);
        assert_eq!(state.current(), before);
    }

    #[test]
    fn test_observe_trend_from_fixed_clock() {
        let now = at(2024, 3, 10, 12);
        let mut state = DeviceState::seeded(9);
        let trend = state.observe_trend_from(now, 3);

        assert_eq!(trend.records()[0].timestamp, now);
        assert_eq!(trend.records()[2].timestamp, at(2024, 3, 8, 12));
    }

    #[test]
    fn test_observe_trend_keeps_time_of_day_across_dst() {
        // US and EU clocks change between these dates.
        let mut state = DeviceState::seeded(9);
        let trend = state.observe_trend_from(at(2024, 4, 2, 12), 30);

        let stamps = trend.iter().map(|r| r.formatted_timestamp()).collect::<Vec<_>>();
        assert_eq!(stamps[1], "2024-04-01 12:00:00");
        assert_eq!(stamps[22], "2024-03-11 12:00:00");
        assert_eq!(stamps[23], "2024-03-10 12:00:00");
        assert_eq!(stamps[24], "2024-03-09 12:00:00");
        assert!(trend.iter().all(|r| r.timestamp.time() == at(2024, 1, 1, 12).time()));
    }

    #[test]
    fn test_observe_trend_is_capped() {
        let mut state = DeviceState::seeded(13);
        let trend = state.observe_trend(usize::MAX);

        assert_eq!(trend.len(), MAX_TREND_DAYS);
        assert_eq!(state.current(), trend.last().unwrap().reading);
    }

    fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_reset_restores_initial_reading() {
        let config = SimulatorConfig::new(18.5, 0.5, 7).unwrap();
        let mut state = DeviceState::with_rng(config, StdRng::seed_from_u64(2));

        state.perturb();
        state.reset();

        assert_eq!(state.current(), DeviceReading::with_temperature(18.5));
    }

    proptest! {
        #[test]
        fn configure_binary_values_touch_only_a_and_b(
            seed in any::<u64>(),
            a in 0i64..=1,
            b in 0i64..=1,
        ) {
            let mut state = DeviceState::seeded(seed);
            state.perturb();
            let before = state.current();

            state.configure(a, b).unwrap();
            let after = state.current();

            prop_assert_eq!(i64::from(after.a.as_u8()), a);
            prop_assert_eq!(i64::from(after.b.as_u8()), b);
            prop_assert_eq!(after.do1, before.do1);
            prop_assert_eq!(after.do2, before.do2);
            prop_assert_eq!(after.tx, before.tx);
        }

        #[test]
        fn configure_rejects_non_binary_values(
            seed in any::<u64>(),
            a in any::<i64>(),
            b in any::<i64>(),
        ) {
            prop_assume!(!(0..=1).contains(&a) || !(0..=1).contains(&b));

            let mut state = DeviceState::seeded(seed);
            state.perturb();
            let before = state.current();

            let result = state.configure(a, b);
            let rejected = matches!(result, Err(ConfigureError::InvalidConfigurationValue { .. }));
            prop_assert!(rejected);
            prop_assert_eq!(state.current(), before);
        }
    }
}
