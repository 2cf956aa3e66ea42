// Copyright © SixtyFPS GmbH <info@slint.dev>
// SPDX-License-Identifier: MIT

pub mod report;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tekx_model::{ConfigureError, DeviceReading, DeviceState, Trend};

/// Convenience helper for sharing one simulated device between threads. For example a thread
/// refreshing a display and another one handling user commands.
///
/// Every method holds the lock for the whole operation, so a trend is never interleaved with a
/// configuration change.
#[derive(Clone, Default)]
pub struct SharedDevice(Arc<Mutex<DeviceState>>);

impl SharedDevice {
    pub fn new(state: DeviceState) -> Self {
        Self(Arc::new(Mutex::new(state)))
    }

    // A panic while the lock was held cannot leave a half-written reading behind.
    fn lock(&self) -> MutexGuard<'_, DeviceState> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current(&self) -> DeviceReading {
        self.lock().current()
    }

    pub fn perturb(&self) {
        self.lock().perturb();
    }

    pub fn configure(&self, a: i64, b: i64) -> Result<(), ConfigureError> {
        self.lock().configure(a, b)
    }

    pub fn reset(&self) {
        self.lock().reset();
    }

    pub fn observe_trend(&self, days: usize) -> Trend {
        self.lock().observe_trend(days)
    }

    /// A trend of the device's configured default length.
    pub fn observe_week(&self) -> Trend {
        self.lock().observe_week()
    }
}

#[test]
fn test_shared_device_across_threads() {
    let device = SharedDevice::new(DeviceState::seeded(21));

    let handles = (0..4)
        .map(|i| {
            let device = device.clone();
            std::thread::spawn(move || {
                for _ in 0..50 {
                    device.perturb();
                    device.configure(i % 2, 1).unwrap();
                }
            })
        })
        .collect::<Vec<_>>();

    for handle in handles {
        handle.join().unwrap();
    }

    let reading = device.current();
    assert_eq!(reading.b, tekx_model::Level::High);
    assert!(reading.tx.is_finite());
    assert_eq!(device.observe_trend(3).len(), 3);
}
