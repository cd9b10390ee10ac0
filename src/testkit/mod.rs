//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::HardwareError;
use crate::hardware::{EdgeCallback, EdgeSource, Level, LevelSource, Subscription};

/// A scriptable drop sensor.
///
/// Tests set the raw level with [`set_level`](MockSensor::set_level) and
/// deliver drop events with [`fire_edge`](MockSensor::fire_edge), which
/// invokes the subscribed callback synchronously like a real interrupt
/// would.
pub struct MockSensor {
    level: Mutex<Level>,
    callback: Mutex<Option<EdgeCallback>>,
    cancelled: Arc<AtomicBool>,
}

impl MockSensor {
    pub fn new() -> Self {
        Self {
            level: Mutex::new(Level::High),
            callback: Mutex::new(None),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn set_level(&self, level: Level) {
        *self.level.lock() = level;
    }

    /// Simulate one falling edge.
    pub fn fire_edge(&self) {
        if self.cancelled.load(Ordering::SeqCst) {
            return;
        }
        if let Some(callback) = self.callback.lock().as_mut() {
            callback();
        }
    }

    /// Whether the subscription handle has been cancelled.
    pub fn subscription_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Default for MockSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeSource for MockSensor {
    fn subscribe_falling(
        &self,
        on_edge: EdgeCallback,
    ) -> Result<Box<dyn Subscription>, HardwareError> {
        *self.callback.lock() = Some(on_edge);
        Ok(Box::new(MockSubscription {
            cancelled: Arc::clone(&self.cancelled),
        }))
    }
}

impl LevelSource for MockSensor {
    fn read_level(&self) -> Result<Level, HardwareError> {
        Ok(*self.level.lock())
    }
}

struct MockSubscription {
    cancelled: Arc<AtomicBool>,
}

impl Subscription for MockSubscription {
    fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

/// A sensor whose level reads always fail, for exercising the watcher's
/// error path.
pub struct FailingLevelSensor;

impl EdgeSource for FailingLevelSensor {
    fn subscribe_falling(
        &self,
        _on_edge: EdgeCallback,
    ) -> Result<Box<dyn Subscription>, HardwareError> {
        Ok(Box::new(MockSubscription {
            cancelled: Arc::new(AtomicBool::new(false)),
        }))
    }
}

impl LevelSource for FailingLevelSensor {
    fn read_level(&self) -> Result<Level, HardwareError> {
        Err(HardwareError::ReadLevel {
            pin: 18,
            reason: "mock read failure".to_string(),
        })
    }
}
