//! `warptoggle connect`, `disconnect` and `toggle`.

use std::process::ExitCode;

use tracing::warn;
use warptoggle_core::{ActionOutcome, ConnectionState, StatusPoller};

use crate::error::{ClientError, ClientResult};

/// A user-requested change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Connect,
    Disconnect,
    Toggle,
}

/// Runs the action, waits for it to settle and prints the resulting state.
///
/// Exits non-zero if the settled state is not the one asked for.
pub async fn run(poller: &StatusPoller, action: Action) -> ClientResult<ExitCode> {
    let target = match action {
        Action::Connect => ConnectionState::Connected,
        Action::Disconnect => ConnectionState::Disconnected,
        Action::Toggle => poller.check_status().await.toggled(),
    };

    let outcome = match target {
        ConnectionState::Connected => poller.request_connect().await,
        ConnectionState::Disconnected => poller.request_disconnect().await,
    };

    match outcome {
        ActionOutcome::Completed(state) => {
            println!("{state}");
            if state == target {
                Ok(ExitCode::SUCCESS)
            } else {
                warn!(
                    expected = %target,
                    actual = %state,
                    settle_secs = poller.config().settle_delay.as_secs(),
                    "warp-cli did not reach the requested state within the settle delay"
                );
                Ok(ExitCode::FAILURE)
            }
        }
        ActionOutcome::SpawnFailed => Err(ClientError::Action(
            poller
                .state()
                .last_error
                .unwrap_or_else(|| "failed to start warp-cli".to_string()),
        )),
        ActionOutcome::Rejected => Err(ClientError::Action(
            "another action is already in progress".to_string(),
        )),
    }
}
