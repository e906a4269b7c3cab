//! `warptoggle watch`: foreground polling.

use std::future::Future;

use chrono::Local;
use tokio::sync::watch;
use tracing::{debug, info};
use warptoggle_core::{ConnectionState, StatusPoller, ToggleState};

use crate::error::ClientResult;

/// Polls until `shutdown` resolves, printing a line per connection change.
pub async fn run<S>(poller: &StatusPoller, shutdown: S) -> ClientResult<()>
where
    S: Future<Output = std::io::Result<crate::signals::ShutdownReason>>,
{
    let mut updates = poller.subscribe();
    let handle = poller.start();
    info!("Watching WARP status, press Ctrl+C to stop");

    let result = watch_changes(&mut updates, shutdown, |state| {
        println!(
            "{} {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            describe(state)
        );
    })
    .await;

    handle.shutdown().await;
    result
}

/// Invokes `on_change` for the first state and every connection change
/// until `shutdown` resolves or the poller goes away.
async fn watch_changes<S, F>(
    updates: &mut watch::Receiver<ToggleState>,
    shutdown: S,
    mut on_change: F,
) -> ClientResult<()>
where
    S: Future<Output = std::io::Result<crate::signals::ShutdownReason>>,
    F: FnMut(&ToggleState),
{
    tokio::pin!(shutdown);
    let mut last: Option<(ConnectionState, Option<String>)> = None;

    loop {
        tokio::select! {
            reason = &mut shutdown => {
                let reason = reason?;
                debug!(signal = %reason, "Stopping watch");
                return Ok(());
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let state = updates.borrow_and_update().clone();
                // Skip the first snapshot until a check has actually run.
                if state.last_checked.is_none() {
                    continue;
                }
                let key = (state.connection, state.last_error.clone());
                if last.as_ref() != Some(&key) {
                    on_change(&state);
                    last = Some(key);
                }
            }
        }
    }
}

fn describe(state: &ToggleState) -> String {
    match state.last_error {
        Some(ref error) => format!("{} ({})", state.connection, error),
        None => state.connection.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fake::{CONNECTED, DISCONNECTED, FakeWarp};
    use crate::signals::ShutdownReason;
    use std::time::Duration;
    use warptoggle_core::CommandOutput;

    #[tokio::test(start_paused = true)]
    async fn prints_only_changes() {
        let warp = FakeWarp::reporting(DISCONNECTED);
        let poller = warp.poller();
        let mut updates = poller.subscribe();
        let handle = poller.start();

        let flipper = tokio::spawn({
            let warp = warp.clone();
            async move {
                // Same state for two polls, then connected, then a failure.
                tokio::time::sleep(Duration::from_secs(45)).await;
                warp.set_status(CommandOutput::new(0, CONNECTED));
                tokio::time::sleep(Duration::from_secs(30)).await;
                warp.set_status(CommandOutput::new(1, ""));
            }
        });

        let mut seen = Vec::new();
        let shutdown = async {
            tokio::time::sleep(Duration::from_secs(100)).await;
            Ok(ShutdownReason::Interrupt)
        };
        watch_changes(&mut updates, shutdown, |state| seen.push(describe(state)))
            .await
            .unwrap();
        handle.shutdown().await;
        flipper.await.unwrap();

        assert_eq!(seen.len(), 3, "{seen:?}");
        assert_eq!(seen[0], "Disconnected");
        assert_eq!(seen[1], "Connected");
        assert!(seen[2].starts_with("Disconnected (warp-cli exited with status 1"));
    }

    #[tokio::test]
    async fn signal_error_is_propagated() {
        let warp = FakeWarp::reporting(DISCONNECTED);
        let poller = warp.poller();
        let mut updates = poller.subscribe();

        let shutdown = async { Err(std::io::Error::other("no signal handler")) };
        let result = watch_changes(&mut updates, shutdown, |_| {}).await;
        assert!(result.is_err());
    }
}
