use ksni::{MenuItem, ToolTip, menu};
use tokio::sync::mpsc::UnboundedSender;

use warptoggle_client::config::TraySettings;
use warptoggle_core::ToggleState;

use super::{TrayAppearance, TrayCommand};

#[derive(Debug)]
pub struct WarpTray {
    tx: UnboundedSender<TrayCommand>,
    settings: TraySettings,
    appearance: TrayAppearance,
}

impl WarpTray {
    pub fn new(tx: UnboundedSender<TrayCommand>, settings: TraySettings) -> Self {
        let appearance = TrayAppearance::from_state(&ToggleState::default(), &settings);
        Self {
            tx,
            settings,
            appearance,
        }
    }

    pub fn set_state(&mut self, state: &ToggleState) {
        self.appearance = TrayAppearance::from_state(state, &self.settings);
    }

    pub fn appearance(&self) -> &TrayAppearance {
        &self.appearance
    }

    fn request_toggle(&self) {
        // Clicks while an action is settling are dropped, like a greyed-out switch.
        if self.appearance.enabled {
            let _ = self.tx.send(TrayCommand::Toggle);
        }
    }
}

impl ksni::Tray for WarpTray {
    fn id(&self) -> String {
        "warptoggle".to_string()
    }

    fn icon_name(&self) -> String {
        self.appearance.icon_name.clone()
    }

    fn title(&self) -> String {
        self.appearance.title.clone()
    }

    fn tool_tip(&self) -> ToolTip {
        ToolTip {
            icon_name: self.appearance.icon_name.clone(),
            title: self.appearance.title.clone(),
            description: self.appearance.tooltip.clone(),
            ..Default::default()
        }
    }

    fn activate(&mut self, _x: i32, _y: i32) {
        self.request_toggle();
    }

    fn menu(&self) -> Vec<MenuItem<Self>> {
        vec![
            menu::CheckmarkItem {
                label: self.appearance.title.clone(),
                checked: self.appearance.checked,
                enabled: self.appearance.enabled,
                activate: Box::new(|tray: &mut Self| tray.request_toggle()),
                ..Default::default()
            }
            .into(),
            menu::StandardItem {
                label: "Refresh now".into(),
                icon_name: "view-refresh".into(),
                activate: Box::new(|tray: &mut Self| {
                    let _ = tray.tx.send(TrayCommand::Refresh);
                }),
                ..Default::default()
            }
            .into(),
            MenuItem::Separator,
            menu::StandardItem {
                label: "Quit".into(),
                icon_name: "application-exit".into(),
                activate: Box::new(|tray: &mut Self| {
                    let _ = tray.tx.send(TrayCommand::Quit);
                }),
                ..Default::default()
            }
            .into(),
        ]
    }
}
