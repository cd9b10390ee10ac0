//! Application orchestration.
//!
//! Wires the sensor, monitor state, broadcast hub and status server
//! together, in the order the lifecycle demands: the hardware subscription
//! is established before the server accepts its first request, and
//! cancelled before the process exits.

use std::sync::Arc;

use tokio::signal;
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::hardware::DripSensor;
use crate::hub::BroadcastHub;
use crate::monitor::{blockage, evaluator, MonitorState};
use crate::server::{self, ServerState};

/// Main application struct.
pub struct App;

impl App {
    /// Run against the real GPIO sensor from the config's pin.
    ///
    /// Fails fatally if the GPIO peripheral cannot be claimed; monitoring
    /// without a sensor is meaningless.
    #[cfg(feature = "gpio")]
    pub async fn run(config: Config) -> Result<()> {
        let sensor = crate::hardware::gpio::IrSensor::connect(config.sensor.pin)?;
        Self::run_with_sensor(config, Arc::new(sensor)).await
    }

    /// Run with an externally supplied sensor implementation.
    pub async fn run_with_sensor(config: Config, sensor: Arc<dyn DripSensor>) -> Result<()> {
        let addr = config.socket_addr()?;
        let state = Arc::new(MonitorState::new());
        let hub = Arc::new(BroadcastHub::new());

        // Subscribe before serving: a request must never race sensor setup.
        let mut subscription = sensor.subscribe_falling(Box::new({
            let state = Arc::clone(&state);
            move || state.stats().record_drop()
        }))?;
        info!(pin = config.sensor.pin, "drop sensor subscribed");

        let watcher = tokio::spawn(blockage::watch_level(
            Arc::clone(&sensor),
            Arc::clone(&state),
        ));
        let eval = tokio::spawn(evaluator::run(Arc::clone(&state), Arc::clone(&hub)));

        let server_state = ServerState {
            monitor: Arc::clone(&state),
            hub: Arc::clone(&hub),
        };

        let result = tokio::select! {
            res = server::serve(server_state, addr) => res,
            _ = signal::ctrl_c() => {
                info!("shutdown signal received");
                Ok(())
            }
        };

        // Teardown order mirrors startup: stop producing, then release the
        // hardware. In-flight pushes are abandoned, not awaited.
        eval.abort();
        watcher.abort();
        subscription.cancel();
        info!("sensor subscription cancelled");

        result
    }
}
