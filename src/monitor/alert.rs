//! Line health classification.
//!
//! The alert state is level-triggered: every evaluation cycle recomputes it
//! from scratch from two independent conditions, with blockage taking
//! priority over stall. There is no hysteresis and no minimum dwell time.

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;

/// How often the evaluator reclassifies and broadcasts.
pub const EVAL_PERIOD: Duration = Duration::from_secs(1);

/// How often the blockage watcher polls the raw sensor level.
pub const LEVEL_POLL_PERIOD: Duration = Duration::from_millis(100);

/// Continuous reflection longer than this means the chamber is obstructed.
pub const BLOCKAGE_THRESHOLD: Duration = Duration::from_secs(3);

/// No drop for longer than this means the line has stopped.
pub const STALL_THRESHOLD: Duration = Duration::from_secs(5);

/// Current classification of line health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertState {
    #[default]
    Normal,
    Blocked,
    Stopped,
}

impl fmt::Display for AlertState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AlertState::Normal => "normal",
            AlertState::Blocked => "blocked",
            AlertState::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// Classify line health from the blockage flag and the last drop time.
pub fn classify(blocked: bool, now: Instant, last_drop_time: Instant) -> AlertState {
    if blocked {
        AlertState::Blocked
    } else if now.saturating_duration_since(last_drop_time) > STALL_THRESHOLD {
        AlertState::Stopped
    } else {
        AlertState::Normal
    }
}
