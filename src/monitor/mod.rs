//! Sensing and alerting engine.
//!
//! Three cooperating pieces, all sharing [`MonitorState`]:
//!
//! - [`stats`] — the drip statistics register, updated from the hardware
//!   edge callback.
//! - [`blockage`] — a watcher task polling the raw sensor level and latching
//!   a blockage flag once reflection persists past the threshold.
//! - [`evaluator`] — the 1-second loop classifying line health and
//!   broadcasting formatted status through the hub.

pub mod alert;
pub mod blockage;
pub mod evaluator;
pub mod stats;

mod state;

pub use alert::AlertState;
pub use state::MonitorState;
pub use stats::{DripStatistics, StatsSnapshot};
