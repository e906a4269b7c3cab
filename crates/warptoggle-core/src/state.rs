//! Observable toggle state.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::status::ConnectionState;

/// Everything a front-end needs to draw the toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleState {
    /// Result of the most recent status check.
    pub connection: ConnectionState,
    /// False while a user-requested connect/disconnect is in flight.
    pub interactive: bool,
    /// True only while the poller writes a status result. Toggle events
    /// arriving in that window are echoes of the write, not user input.
    pub updating: bool,
    /// When the last status check finished.
    pub last_checked: Option<DateTime<Utc>>,
    /// Why the last status check failed, if it did.
    pub last_error: Option<String>,
}

impl Default for ToggleState {
    fn default() -> Self {
        Self {
            connection: ConnectionState::Disconnected,
            interactive: true,
            updating: false,
            last_checked: None,
            last_error: None,
        }
    }
}

impl ToggleState {
    /// Returns true if the last check reported the tunnel up.
    pub fn connected(&self) -> bool {
        self.connection.is_connected()
    }

    /// Returns true if a toggle event should be treated as user input.
    pub fn accepts_input(&self) -> bool {
        self.interactive && !self.updating
    }
}

/// Receives every toggle state change, synchronously.
///
/// Called from inside the poller, so implementations must not block. They
/// may call back into the poller (for example a widget whose "toggled"
/// signal fires on programmatic changes).
pub trait ToggleObserver: Send + Sync {
    fn state_changed(&self, state: &ToggleState);
}

impl<F> ToggleObserver for F
where
    F: Fn(&ToggleState) + Send + Sync,
{
    fn state_changed(&self, state: &ToggleState) {
        self(state)
    }
}
