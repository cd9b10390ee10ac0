//! The periodic evaluation loop.
//!
//! Once per [`EVAL_PERIOD`]: snapshot the statistics register, classify line
//! health, store the alert state, and broadcast the formatted status to
//! every observer. This is the single push cadence; the query endpoint
//! formats the same state on demand.

use std::sync::Arc;

use tokio::time::{Instant, MissedTickBehavior};
use tracing::info;

use crate::hub::BroadcastHub;
use crate::monitor::alert::{classify, EVAL_PERIOD};
use crate::monitor::MonitorState;
use crate::status::format_status;

/// Run the evaluation loop until the task is aborted at shutdown.
pub async fn run(state: Arc<MonitorState>, hub: Arc<BroadcastHub>) {
    let mut tick = tokio::time::interval(EVAL_PERIOD);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tick.tick().await;

        let snapshot = state.stats().snapshot();
        let next = classify(state.is_blocked(), Instant::now(), snapshot.last_drop_time);

        let previous = state.alert();
        if next != previous {
            info!(
                from = %previous,
                to = %next,
                drop_count = snapshot.drop_count,
                "alert state changed"
            );
        }
        state.set_alert(next);

        hub.broadcast(&format_status(next, snapshot.drip_rate));
    }
}
