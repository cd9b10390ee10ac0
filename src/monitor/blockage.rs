//! Blockage detection.
//!
//! A blocked chamber shows up as continuous reflection: the sensor line
//! stays low with no edges. The watcher polls the raw level on its own task
//! and latches a flag once the low reading persists past
//! [`BLOCKAGE_THRESHOLD`], so the evaluator's cadence is never held up by
//! the wait. Any high reading clears the latch immediately.

use std::sync::Arc;

use tokio::time::{Instant, MissedTickBehavior};
use tracing::warn;

use crate::hardware::{DripSensor, Level};
use crate::monitor::alert::{BLOCKAGE_THRESHOLD, LEVEL_POLL_PERIOD};
use crate::monitor::MonitorState;

/// Debounce latch over successive level readings.
///
/// `observe` returns whether the line counts as blocked: true once the
/// level has read low for strictly longer than the threshold, false as soon
/// as it reads high again.
pub struct BlockageLatch {
    low_since: Option<Instant>,
}

impl BlockageLatch {
    pub fn new() -> Self {
        Self { low_since: None }
    }

    pub fn observe(&mut self, level: Level, now: Instant) -> bool {
        match level {
            Level::High => {
                self.low_since = None;
                false
            }
            Level::Low => {
                let since = *self.low_since.get_or_insert(now);
                now.saturating_duration_since(since) > BLOCKAGE_THRESHOLD
            }
        }
    }
}

impl Default for BlockageLatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Poll the raw sensor level and keep the shared blocked flag current.
///
/// Runs until the task is aborted at shutdown. A failed read is logged and
/// treated as an unobstructed (high) reading so a flaky poll cannot latch a
/// false alarm.
pub async fn watch_level(sensor: Arc<dyn DripSensor>, state: Arc<MonitorState>) {
    let mut latch = BlockageLatch::new();
    let mut tick = tokio::time::interval(LEVEL_POLL_PERIOD);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tick.tick().await;

        let level = match sensor.read_level() {
            Ok(level) => level,
            Err(e) => {
                warn!(error = %e, "level poll failed");
                Level::High
            }
        };

        state.set_blocked(latch.observe(level, Instant::now()));
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::testkit::MockSensor;

    #[tokio::test(start_paused = true)]
    async fn latch_fires_after_threshold() {
        let mut latch = BlockageLatch::new();
        let t0 = Instant::now();

        assert!(!latch.observe(Level::Low, t0));
        assert!(!latch.observe(Level::Low, t0 + BLOCKAGE_THRESHOLD));
        assert!(latch.observe(
            Level::Low,
            t0 + BLOCKAGE_THRESHOLD + Duration::from_millis(100)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn high_reading_clears_latch() {
        let mut latch = BlockageLatch::new();
        let t0 = Instant::now();

        latch.observe(Level::Low, t0);
        assert!(!latch.observe(Level::High, t0 + Duration::from_secs(4)));
        // Restarting low counts from scratch.
        assert!(!latch.observe(Level::Low, t0 + Duration::from_secs(5)));
        assert!(!latch.observe(Level::Low, t0 + Duration::from_secs(7)));
    }

    #[tokio::test(start_paused = true)]
    async fn watcher_sets_and_clears_shared_flag() {
        let sensor = Arc::new(MockSensor::new());
        let state = Arc::new(MonitorState::new());

        let task = tokio::spawn(watch_level(sensor.clone(), state.clone()));

        sensor.set_level(Level::Low);
        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert!(state.is_blocked());

        sensor.set_level(Level::High);
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(!state.is_blocked());

        task.abort();
    }
}
