//! Raspberry Pi GPIO backend for the drop sensor, built on `rppal`.
//!
//! The pin is configured as an input with the internal pull-up enabled so
//! the line never floats between drops.

use std::sync::Arc;

use parking_lot::Mutex;
use rppal::gpio::{Gpio, InputPin, Trigger};
use tracing::debug;

use crate::error::HardwareError;
use crate::hardware::{EdgeCallback, EdgeSource, Level, LevelSource, Subscription};

/// Reflective IR drop sensor on a single GPIO pin.
pub struct IrSensor {
    pin: Arc<Mutex<InputPin>>,
    pin_number: u8,
}

impl IrSensor {
    /// Claim the pin and configure it for sensing.
    ///
    /// Fails if the GPIO peripheral is unavailable (not a Pi, missing
    /// permissions on /dev/gpiomem) or the pin is already claimed. Callers
    /// treat this as fatal; there is nothing to monitor without a sensor.
    pub fn connect(pin_number: u8) -> Result<Self, HardwareError> {
        let gpio = Gpio::new().map_err(|e| HardwareError::Connect(e.to_string()))?;
        let pin = gpio
            .get(pin_number)
            .map_err(|e| HardwareError::Connect(e.to_string()))?
            .into_input_pullup();

        debug!(pin = pin_number, "GPIO pin claimed with pull-up");

        Ok(Self {
            pin: Arc::new(Mutex::new(pin)),
            pin_number,
        })
    }
}

impl EdgeSource for IrSensor {
    fn subscribe_falling(
        &self,
        mut on_edge: EdgeCallback,
    ) -> Result<Box<dyn Subscription>, HardwareError> {
        self.pin
            .lock()
            .set_async_interrupt(Trigger::FallingEdge, move |_level| on_edge())
            .map_err(|e| HardwareError::Subscribe {
                pin: self.pin_number,
                reason: e.to_string(),
            })?;

        Ok(Box::new(GpioSubscription {
            pin: Arc::clone(&self.pin),
            pin_number: self.pin_number,
            cancelled: false,
        }))
    }
}

impl LevelSource for IrSensor {
    fn read_level(&self) -> Result<Level, HardwareError> {
        let level = match self.pin.lock().read() {
            rppal::gpio::Level::Low => Level::Low,
            rppal::gpio::Level::High => Level::High,
        };
        Ok(level)
    }
}

struct GpioSubscription {
    pin: Arc<Mutex<InputPin>>,
    pin_number: u8,
    cancelled: bool,
}

impl Subscription for GpioSubscription {
    fn cancel(&mut self) {
        if self.cancelled {
            return;
        }
        self.cancelled = true;
        if let Err(e) = self.pin.lock().clear_async_interrupt() {
            debug!(pin = self.pin_number, error = %e, "failed to clear interrupt");
        }
    }
}
