use ksni::{Handle, TrayMethods};
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use warptoggle_client::config::TraySettings;
use warptoggle_core::ToggleState;

use super::TrayCommand;
use super::sni::WarpTray;

/// Registered tray item plus the task mirroring poller state into it.
pub struct TrayManager {
    handle: Handle<WarpTray>,
    sync_task: JoinHandle<()>,
}

impl TrayManager {
    /// Registers the tray item and keeps it in sync with `updates`.
    pub async fn start(
        settings: TraySettings,
        tx: UnboundedSender<TrayCommand>,
        mut updates: watch::Receiver<ToggleState>,
    ) -> Result<Self, ksni::Error> {
        let mut tray = WarpTray::new(tx, settings);
        tray.set_state(&updates.borrow_and_update());
        let handle = tray.spawn().await?;

        let sync_handle = handle.clone();
        let sync_task = tokio::spawn(async move {
            while updates.changed().await.is_ok() {
                let state = updates.borrow_and_update().clone();
                if sync_handle
                    .update(move |tray| tray.set_state(&state))
                    .await
                    .is_none()
                {
                    debug!("Tray service gone, stopping state sync");
                    break;
                }
            }
        });

        Ok(Self { handle, sync_task })
    }

    /// Unregisters the tray item.
    pub async fn shutdown(self) {
        self.sync_task.abort();
        self.handle.shutdown().await;
    }
}
