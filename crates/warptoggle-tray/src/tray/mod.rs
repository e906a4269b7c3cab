pub mod manager;
pub mod sni;

use warptoggle_client::config::TraySettings;
use warptoggle_core::ToggleState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayCommand {
    Toggle,
    Refresh,
    Quit,
}

/// How the tray item should look for a given toggle state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrayAppearance {
    pub icon_name: String,
    pub title: String,
    pub tooltip: String,
    /// Checkmark on the toggle entry.
    pub checked: bool,
    /// Whether the toggle entry can be clicked.
    pub enabled: bool,
}

impl TrayAppearance {
    pub fn from_state(state: &ToggleState, settings: &TraySettings) -> Self {
        let icon_name = if state.connected() {
            &settings.connected_icon
        } else {
            &settings.disconnected_icon
        };

        let mut tooltip = if state.interactive {
            state.connection.to_string()
        } else {
            "Switching…".to_string()
        };
        if let Some(ref error) = state.last_error {
            tooltip.push('\n');
            tooltip.push_str(error);
        }

        Self {
            icon_name: icon_name.clone(),
            title: settings.title.clone(),
            tooltip,
            checked: state.connected(),
            enabled: state.interactive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warptoggle_core::ConnectionState;

    #[test]
    fn connected_appearance() {
        let state = ToggleState {
            connection: ConnectionState::Connected,
            ..ToggleState::default()
        };
        let look = TrayAppearance::from_state(&state, &TraySettings::default());

        assert_eq!(look.icon_name, "weather-cloudy-symbolic");
        assert_eq!(look.title, "Cloudflare WARP");
        assert_eq!(look.tooltip, "Connected");
        assert!(look.checked);
        assert!(look.enabled);
    }

    #[test]
    fn busy_appearance_disables_toggle() {
        let state = ToggleState {
            interactive: false,
            ..ToggleState::default()
        };
        let look = TrayAppearance::from_state(&state, &TraySettings::default());

        assert_eq!(look.icon_name, "network-vpn-disconnected-symbolic");
        assert_eq!(look.tooltip, "Switching…");
        assert!(!look.checked);
        assert!(!look.enabled);
    }

    #[test]
    fn error_is_shown_in_tooltip() {
        let state = ToggleState {
            last_error: Some("failed to run warp-cli: not found".into()),
            ..ToggleState::default()
        };
        let settings = TraySettings {
            disconnected_icon: "custom-off".into(),
            ..TraySettings::default()
        };
        let look = TrayAppearance::from_state(&state, &settings);

        assert_eq!(look.icon_name, "custom-off");
        assert_eq!(
            look.tooltip,
            "Disconnected\nfailed to run warp-cli: not found"
        );
    }
}
