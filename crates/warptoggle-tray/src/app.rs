//! Tray front-end: wires the status poller to the tray item.

use std::io;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info};

use warptoggle_client::config::{ClientConfig, ConfigError, TraySettings};
use warptoggle_client::signals;
use warptoggle_core::{ActionOutcome, StatusPoller};

use crate::notify::notify_settled;
use crate::tray::TrayCommand;
use crate::tray::manager::TrayManager;

/// Errors that stop the tray front-end.
#[derive(Debug, Error)]
pub enum TrayError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to register tray item: {0}")]
    Tray(#[from] ksni::Error),

    #[error("failed to install signal handlers: {0}")]
    Signal(#[from] io::Error),
}

#[derive(Debug)]
pub struct TrayApp {
    poller: StatusPoller,
    settings: TraySettings,
}

impl TrayApp {
    pub fn new(config: &ClientConfig) -> Result<Self, TrayError> {
        config.validate()?;
        Ok(Self::with_poller(config.build_poller(), config.tray.clone()))
    }

    pub fn with_poller(poller: StatusPoller, settings: TraySettings) -> Self {
        Self { poller, settings }
    }

    pub fn poller(&self) -> &StatusPoller {
        &self.poller
    }

    /// Runs until Quit is chosen from the menu or a shutdown signal arrives.
    pub async fn run(self) -> Result<(), TrayError> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let tray = TrayManager::start(self.settings.clone(), tx, self.poller.subscribe()).await?;
        let poller_handle = self.poller.start();
        info!("Tray started");

        let shutdown = signals::wait_for_shutdown();
        tokio::pin!(shutdown);

        let result = loop {
            tokio::select! {
                command = rx.recv() => match command {
                    Some(command) if self.handle_command(command) => {}
                    _ => break Ok(()),
                },
                reason = &mut shutdown => break reason.map(|_| ()).map_err(TrayError::from),
            }
        };

        poller_handle.shutdown().await;
        tray.shutdown().await;
        info!("Tray stopped");
        result
    }

    /// Handles one menu command; returns false when the app should quit.
    pub fn handle_command(&self, command: TrayCommand) -> bool {
        debug!(?command, "Tray command");
        match command {
            TrayCommand::Toggle => {
                let poller = self.poller.clone();
                let settings = self.settings.clone();
                tokio::spawn(async move {
                    let requested = poller.state().connection.toggled();
                    let outcome = poller.toggle().await;
                    if settings.notify
                        && let ActionOutcome::Completed(settled) = outcome
                    {
                        notify_settled(&settings, requested, settled);
                    }
                });
                true
            }
            TrayCommand::Refresh => {
                let poller = self.poller.clone();
                tokio::spawn(async move {
                    poller.check_status().await;
                });
                true
            }
            TrayCommand::Quit => false,
        }
    }
}
