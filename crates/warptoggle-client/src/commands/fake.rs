//! Scripted `warp-cli` for command tests.

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use warptoggle_core::{
    BoxFuture, CommandOutput, CommandRunner, PollerConfig, StatusPoller, StatusResult, WarpCommand,
};

pub const CONNECTED: &str = "Status update: Connected\n";
pub const DISCONNECTED: &str = "Status update: Disconnected\n";

/// Reports `status`, and flips it on `connect`/`disconnect` unless `stuck`.
#[derive(Debug, Default)]
pub struct FakeWarp {
    pub status: Mutex<CommandOutput>,
    pub spawned: Mutex<Vec<WarpCommand>>,
    pub stuck: bool,
}

impl FakeWarp {
    pub fn reporting(stdout: &str) -> Arc<Self> {
        Arc::new(Self {
            status: Mutex::new(CommandOutput::new(0, stdout)),
            ..Default::default()
        })
    }

    pub fn set_status(&self, output: CommandOutput) {
        *self.status.lock().unwrap() = output;
    }

    pub fn poller(self: &Arc<Self>) -> StatusPoller {
        StatusPoller::new(
            self.clone(),
            PollerConfig::new(Duration::from_secs(30)).with_settle_delay(Duration::from_secs(3)),
        )
    }
}

impl CommandRunner for FakeWarp {
    fn program(&self) -> &str {
        "warp-cli"
    }

    fn output(&self, _command: WarpCommand) -> BoxFuture<'_, StatusResult<CommandOutput>> {
        Box::pin(async move { Ok(self.status.lock().unwrap().clone()) })
    }

    fn spawn(&self, command: WarpCommand) -> io::Result<()> {
        self.spawned.lock().unwrap().push(command);
        if !self.stuck {
            let stdout = match command {
                WarpCommand::Connect => CONNECTED,
                _ => DISCONNECTED,
            };
            self.set_status(CommandOutput::new(0, stdout));
        }
        Ok(())
    }
}
