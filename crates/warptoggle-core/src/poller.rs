//! Periodic `warp-cli status` polling and user-initiated actions.
//!
//! The [`StatusPoller`] owns the toggle state. Two things write to it:
//! - the repeating timer started by [`StatusPoller::start`], which refreshes
//!   `connection` as a programmatic update;
//! - user requests ([`StatusPoller::request_connect`] and friends), which
//!   take the action lock (`interactive = false`), spawn the action, wait
//!   for the settle delay, re-check the status and release the lock.
//!
//! The action lock is released by a drop guard, so a failed spawn, a panic
//! or a cancelled request future all leave the toggle interactive again.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::command::{CommandRunner, WarpCommand};
use crate::state::{ToggleObserver, ToggleState};
use crate::status::{ConnectionState, parse_status};

/// Poller timing configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerConfig {
    /// Interval between background status checks.
    pub interval: Duration,
    /// Wait between spawning connect/disconnect and re-checking the status.
    pub settle_delay: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            settle_delay: Duration::from_secs(3),
        }
    }
}

impl PollerConfig {
    /// Shortest interval accepted by [`StatusPoller::start`].
    pub const MIN_INTERVAL: Duration = Duration::from_millis(100);

    /// Creates a config with the given polling interval.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            ..Default::default()
        }
    }

    /// Builder: set the settle delay.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }
}

/// What happened to a user request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Another action was in flight or a programmatic update was running.
    Rejected,
    /// The action command could not be started.
    SpawnFailed,
    /// The action ran and the follow-up check reported this state.
    Completed(ConnectionState),
}

impl ActionOutcome {
    /// Returns the post-action state, if the action got that far.
    pub fn state(self) -> Option<ConnectionState> {
        match self {
            Self::Completed(state) => Some(state),
            Self::Rejected | Self::SpawnFailed => None,
        }
    }
}

struct Inner {
    runner: Arc<dyn CommandRunner>,
    config: PollerConfig,
    state: Mutex<ToggleState>,
    /// Programmatic writes whose observers are still running. Only touched
    /// with `state` locked; `updating` is true while this is non-zero.
    writes_in_flight: AtomicUsize,
    observers: Mutex<Vec<Arc<dyn ToggleObserver>>>,
    published: watch::Sender<ToggleState>,
}

/// Polls `warp-cli status` and serializes connect/disconnect requests.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct StatusPoller {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for StatusPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusPoller")
            .field("program", &self.inner.runner.program())
            .field("config", &self.inner.config)
            .field("state", &*self.lock_state())
            .finish()
    }
}

impl StatusPoller {
    /// Creates a poller. Nothing runs until [`start`](Self::start) or one of
    /// the request methods is called.
    pub fn new(runner: Arc<dyn CommandRunner>, config: PollerConfig) -> Self {
        let (published, _) = watch::channel(ToggleState::default());
        Self {
            inner: Arc::new(Inner {
                runner,
                config,
                state: Mutex::new(ToggleState::default()),
                writes_in_flight: AtomicUsize::new(0),
                observers: Mutex::new(Vec::new()),
                published,
            }),
        }
    }

    /// Returns the poller configuration.
    pub fn config(&self) -> &PollerConfig {
        &self.inner.config
    }

    /// Returns a snapshot of the current state.
    pub fn state(&self) -> ToggleState {
        self.lock_state().clone()
    }

    /// Subscribes to settled state changes.
    ///
    /// Receivers never observe `updating == true`; use
    /// [`add_observer`](Self::add_observer) to see programmatic writes as
    /// they happen.
    pub fn subscribe(&self) -> watch::Receiver<ToggleState> {
        self.inner.published.subscribe()
    }

    /// Registers a synchronous observer.
    pub fn add_observer(&self, observer: Arc<dyn ToggleObserver>) {
        self.inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    /// Runs an immediate status check, then one every `interval`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> PollerHandle {
        let interval = self.inner.config.interval.max(PollerConfig::MIN_INTERVAL);
        info!(
            ?interval,
            program = self.inner.runner.program(),
            "Status poller started"
        );

        let poller = self.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                // The first tick completes immediately.
                ticker.tick().await;
                poller.check_status().await;
            }
        });

        PollerHandle { task: Some(task) }
    }

    /// Queries `warp-cli status` and records the result.
    ///
    /// Never fails: any error is logged and reported as
    /// [`ConnectionState::Disconnected`]. Does not touch `interactive`.
    pub async fn check_status(&self) -> ConnectionState {
        let runner = &self.inner.runner;
        debug!("Checking WARP status");

        let result = match runner.output(WarpCommand::Status).await {
            Ok(output) => parse_status(runner.program(), &output),
            Err(e) => Err(e),
        };

        match result {
            Ok(connection) => {
                debug!(%connection, "Status check finished");
                self.apply_status(connection, None);
                connection
            }
            Err(e) => {
                warn!(error = %e, "Status check failed, treating as disconnected");
                self.apply_status(ConnectionState::Disconnected, Some(e.to_string()));
                ConnectionState::Disconnected
            }
        }
    }

    /// Connects, unless another action is in flight.
    pub async fn request_connect(&self) -> ActionOutcome {
        self.request(WarpCommand::Connect).await
    }

    /// Disconnects, unless another action is in flight.
    pub async fn request_disconnect(&self) -> ActionOutcome {
        self.request(WarpCommand::Disconnect).await
    }

    /// Connects when disconnected and disconnects when connected.
    pub async fn toggle(&self) -> ActionOutcome {
        let command = action_for(self.lock_state().connection.toggled());
        self.request(command).await
    }

    /// Entry point for a widget "toggled" callback carrying the widget's new
    /// checked value.
    ///
    /// Returns false when the event is ignored: the toggle is not interactive
    /// or the event is the echo of a programmatic update. Otherwise the
    /// action runs in a background task and true is returned.
    ///
    /// Must be called from within a tokio runtime.
    pub fn handle_toggle(&self, checked: bool) -> bool {
        let Some(guard) = self.begin_action() else {
            return false;
        };

        let poller = self.clone();
        let command = action_for(ConnectionState::from(checked));
        tokio::spawn(async move {
            poller.run_action(guard, command).await;
        });
        true
    }

    async fn request(&self, command: WarpCommand) -> ActionOutcome {
        match self.begin_action() {
            Some(guard) => self.run_action(guard, command).await,
            None => ActionOutcome::Rejected,
        }
    }

    /// Takes the action lock if the toggle accepts input.
    fn begin_action(&self) -> Option<ActionGuard> {
        let snapshot = {
            let mut state = self.lock_state();
            if !state.accepts_input() {
                debug!(
                    interactive = state.interactive,
                    updating = state.updating,
                    "Ignoring toggle request"
                );
                return None;
            }
            state.interactive = false;
            state.clone()
        };
        self.publish(snapshot);

        Some(ActionGuard {
            poller: self.clone(),
        })
    }

    async fn run_action(&self, guard: ActionGuard, command: WarpCommand) -> ActionOutcome {
        info!(%command, "Running warp-cli action");

        if let Err(e) = self.inner.runner.spawn(command) {
            error!(%command, error = %e, "Failed to start warp-cli action");
            self.lock_state().last_error = Some(format!("failed to run {command}: {e}"));
            drop(guard);
            return ActionOutcome::SpawnFailed;
        }

        // warp-cli gives no acknowledgement; give the daemon time to switch.
        tokio::time::sleep(self.inner.config.settle_delay).await;
        let connection = self.check_status().await;
        drop(guard);

        info!(%command, %connection, "warp-cli action settled");
        ActionOutcome::Completed(connection)
    }

    /// Writes a status result as a programmatic update.
    fn apply_status(&self, connection: ConnectionState, error: Option<String>) {
        let (previous, snapshot) = {
            let mut state = self.lock_state();
            let previous = state.connection;
            self.inner.writes_in_flight.fetch_add(1, Ordering::SeqCst);
            state.updating = true;
            state.connection = connection;
            state.last_checked = Some(Utc::now());
            state.last_error = error;
            (previous, state.clone())
        };

        if previous != connection {
            info!(from = %previous, to = %connection, "WARP connection changed");
        }

        self.notify_observers(&snapshot);

        let snapshot = {
            let mut state = self.lock_state();
            // Overlapping checks: the flag stays up until the last write ends.
            if self.inner.writes_in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
                state.updating = false;
            }
            state.clone()
        };
        self.send_settled(snapshot);
    }

    fn release_action(&self) {
        let snapshot = {
            let mut state = self.lock_state();
            state.interactive = true;
            state.clone()
        };
        debug!("Toggle interactive again");
        self.publish(snapshot);
    }

    fn publish(&self, snapshot: ToggleState) {
        self.notify_observers(&snapshot);
        self.send_settled(snapshot);
    }

    fn send_settled(&self, mut snapshot: ToggleState) {
        snapshot.updating = false;
        self.inner.published.send_replace(snapshot);
    }

    fn notify_observers(&self, snapshot: &ToggleState) {
        // Clone the list so observers can call back into the poller.
        let observers = self
            .inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for observer in observers {
            observer.state_changed(snapshot);
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, ToggleState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn action_for(target: ConnectionState) -> WarpCommand {
    match target {
        ConnectionState::Connected => WarpCommand::Connect,
        ConnectionState::Disconnected => WarpCommand::Disconnect,
    }
}

/// Holds the action lock; makes the toggle interactive again when dropped.
struct ActionGuard {
    poller: StatusPoller,
}

impl Drop for ActionGuard {
    fn drop(&mut self) {
        self.poller.release_action();
    }
}

/// Handle to the repeating status check started by [`StatusPoller::start`].
///
/// Dropping the handle stops the timer.
#[derive(Debug)]
pub struct PollerHandle {
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Cancels the repeating check. Safe to call more than once.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!("Status poller stopped");
        }
    }

    /// Cancels the repeating check and waits for the task to wind down.
    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            if let Err(e) = task.await
                && !e.is_cancelled()
            {
                error!(error = %e, "Status poller task failed");
            }
            info!("Status poller stopped");
        }
    }

    /// Returns true until [`stop`](Self::stop) has been called.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
