//! Sensor hardware abstraction.
//!
//! The drop sensor is a reflective IR pair wired to a GPIO pin with the
//! internal pull-up enabled: the line idles high and reads low while a drop
//! (or a blockage) reflects the beam. The monitor consumes the sensor
//! through two small traits so tests can substitute a mock:
//!
//! - [`EdgeSource`] — falling-edge interrupt subscription (one edge = one
//!   drop), cancellable via the returned [`Subscription`] handle.
//! - [`LevelSource`] — raw level polling, used by the blockage watcher.
//!
//! The real Raspberry Pi implementation lives in [`gpio`] behind the `gpio`
//! cargo feature.

#[cfg(feature = "gpio")]
pub mod gpio;

use crate::error::HardwareError;

/// Raw logic level of the sensor pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Line idle, no reflection.
    High,
    /// Reflection detected.
    Low,
}

/// Callback invoked on each falling edge, from the interrupt thread.
pub type EdgeCallback = Box<dyn FnMut() + Send + 'static>;

/// Cancellable handle for an active edge subscription.
///
/// Dropping the handle without calling [`cancel`](Subscription::cancel) does
/// not detach the interrupt; shutdown must cancel explicitly before the
/// process exits.
pub trait Subscription: Send {
    /// Detach the interrupt. Idempotent.
    fn cancel(&mut self);
}

/// A source of falling-edge notifications.
pub trait EdgeSource: Send + Sync {
    /// Attach `on_edge` to the sensor's falling edge.
    ///
    /// The callback runs on the hardware interrupt thread, concurrently with
    /// everything else; it must confine itself to brief, non-blocking work.
    fn subscribe_falling(&self, on_edge: EdgeCallback)
        -> Result<Box<dyn Subscription>, HardwareError>;
}

/// A source of raw pin level readings.
pub trait LevelSource: Send + Sync {
    fn read_level(&self) -> Result<Level, HardwareError>;
}

/// The full drop sensor interface: edge events plus raw level.
pub trait DripSensor: EdgeSource + LevelSource {}

impl<T: EdgeSource + LevelSource> DripSensor for T {}
