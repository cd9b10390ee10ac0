//! The drip statistics register.
//!
//! A single shared instance lives for the process lifetime. The hardware
//! edge callback is the only writer; the evaluator and the query endpoint
//! read consistent snapshots.

use parking_lot::Mutex;
use tokio::time::Instant;

/// A consistent view of the register at one point in time.
#[derive(Debug, Clone, Copy)]
pub struct StatsSnapshot {
    pub drop_count: u64,
    pub last_drop_time: Instant,
    /// Drops per minute, derived from the spacing of the last two drops.
    pub drip_rate: f64,
}

struct Inner {
    drop_count: u64,
    last_drop_time: Instant,
    drip_rate: f64,
}

/// Drop count, last-drop timestamp and instantaneous rate, guarded as one
/// unit so no reader ever observes a torn triple.
pub struct DripStatistics {
    inner: Mutex<Inner>,
}

impl DripStatistics {
    /// Create the register with `last_drop_time` set to now, so a line that
    /// never drips trips the stall alert one threshold after startup.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                drop_count: 0,
                last_drop_time: Instant::now(),
                drip_rate: 0.0,
            }),
        }
    }

    /// Record one qualifying falling edge at the current time.
    pub fn record_drop(&self) {
        self.record_drop_at(Instant::now());
    }

    /// Record one qualifying falling edge observed at `now`.
    ///
    /// Count increment, rate derivation and timestamp update happen in a
    /// single critical section. A zero (or backwards) elapsed interval
    /// skips the rate update rather than dividing by zero, and never moves
    /// `last_drop_time` backwards.
    pub fn record_drop_at(&self, now: Instant) {
        let mut inner = self.inner.lock();
        inner.drop_count += 1;
        let elapsed = now.saturating_duration_since(inner.last_drop_time);
        if !elapsed.is_zero() {
            inner.drip_rate = 60.0 / elapsed.as_secs_f64();
        }
        if now > inner.last_drop_time {
            inner.last_drop_time = now;
        }
    }

    /// A consistent `(drop_count, last_drop_time, drip_rate)` triple.
    pub fn snapshot(&self) -> StatsSnapshot {
        let inner = self.inner.lock();
        StatsSnapshot {
            drop_count: inner.drop_count,
            last_drop_time: inner.last_drop_time,
            drip_rate: inner.drip_rate,
        }
    }
}

impl Default for DripStatistics {
    fn default() -> Self {
        Self::new()
    }
}
