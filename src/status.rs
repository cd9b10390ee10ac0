//! Status line formatting.

use crate::monitor::alert::AlertState;

/// Render the user-facing status line for an alert state and drip rate.
///
/// The displayed rate wraps at 50 drops/min. This reproduces the behavior
/// of the deployed firmware exactly; the wrap applies at render time only
/// and the internal rate stays unbounded.
pub fn format_status(state: AlertState, drip_rate: f64) -> String {
    match state {
        AlertState::Blocked => "ALERT: Drip too fast".to_string(),
        AlertState::Stopped => "ALERT: Drip stopped!".to_string(),
        AlertState::Normal => {
            let displayed = (drip_rate % 50.0).trunc() as u64;
            format!("Drip rate: {displayed} drops/min")
        }
    }
}
