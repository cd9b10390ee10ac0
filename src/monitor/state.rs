//! Shared monitor state.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use crate::monitor::alert::AlertState;
use crate::monitor::stats::DripStatistics;
use crate::status::format_status;

/// State shared between the edge callback, the blockage watcher, the
/// evaluator and the status server.
///
/// Ownership of the pieces is strict: only the edge callback mutates the
/// statistics register, only the blockage watcher flips the blocked flag,
/// only the evaluator stores the alert state. Everyone may read.
pub struct MonitorState {
    stats: DripStatistics,
    alert: RwLock<AlertState>,
    blocked: AtomicBool,
}

impl MonitorState {
    pub fn new() -> Self {
        Self {
            stats: DripStatistics::new(),
            alert: RwLock::new(AlertState::Normal),
            blocked: AtomicBool::new(false),
        }
    }

    /// The drip statistics register.
    pub fn stats(&self) -> &DripStatistics {
        &self.stats
    }

    pub fn alert(&self) -> AlertState {
        *self.alert.read()
    }

    pub fn set_alert(&self, state: AlertState) {
        *self.alert.write() = state;
    }

    /// Whether the blockage watcher currently considers the chamber
    /// obstructed.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// The user-facing status line, computed on demand from present state.
    pub fn status_message(&self) -> String {
        format_status(self.alert(), self.stats.snapshot().drip_rate)
    }
}

impl Default for MonitorState {
    fn default() -> Self {
        Self::new()
    }
}
