//! Desktop notification sent when a tray toggle settles.

use notify_rust::Notification;
use tracing::{debug, error};

use warptoggle_client::config::TraySettings;
use warptoggle_core::ConnectionState;

/// Body text for a settled toggle.
pub fn settled_message(requested: ConnectionState, settled: ConnectionState) -> String {
    match (requested, settled) {
        (ConnectionState::Connected, ConnectionState::Connected) => "WARP is connected".into(),
        (ConnectionState::Disconnected, ConnectionState::Disconnected) => {
            "WARP is disconnected".into()
        }
        (_, settled) => format!("WARP is still {}", settled.to_string().to_lowercase()),
    }
}

/// Sends the notification off the async runtime; failures are only logged.
pub fn notify_settled(settings: &TraySettings, requested: ConnectionState, settled: ConnectionState) {
    let summary = settings.title.clone();
    let body = settled_message(requested, settled);
    let icon = if settled.is_connected() {
        settings.connected_icon.clone()
    } else {
        settings.disconnected_icon.clone()
    };

    tokio::task::spawn_blocking(move || {
        debug!(%body, "Sending notification");
        let result = Notification::new()
            .appname("warptoggle")
            .summary(&summary)
            .body(&body)
            .icon(&icon)
            .show();
        if let Err(e) = result {
            error!(error = %e, "Failed to send notification");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        use ConnectionState::{Connected, Disconnected};

        assert_eq!(settled_message(Connected, Connected), "WARP is connected");
        assert_eq!(
            settled_message(Disconnected, Disconnected),
            "WARP is disconnected"
        );
        assert_eq!(
            settled_message(Connected, Disconnected),
            "WARP is still disconnected"
        );
    }
}
