//! Shutdown signal handling for the long-running front-ends.
//!
//! SIGTERM and SIGINT (Ctrl+C) both request a clean shutdown: the poller is
//! stopped before the process exits.

use std::io;

use tracing::info;

/// Which signal asked us to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    Interrupt,
    Terminate,
}

impl std::fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Interrupt => f.write_str("SIGINT"),
            Self::Terminate => f.write_str("SIGTERM"),
        }
    }
}

/// Waits until a shutdown signal arrives.
///
/// # Errors
///
/// Returns an error if the signal handlers cannot be installed.
#[cfg(unix)]
pub async fn wait_for_shutdown() -> io::Result<ShutdownReason> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    let reason = tokio::select! {
        _ = sigterm.recv() => ShutdownReason::Terminate,
        _ = sigint.recv() => ShutdownReason::Interrupt,
    };
    info!(signal = %reason, "Received shutdown signal");
    Ok(reason)
}

/// Non-Unix implementation: Ctrl+C only.
#[cfg(not(unix))]
pub async fn wait_for_shutdown() -> io::Result<ShutdownReason> {
    tokio::signal::ctrl_c().await?;
    info!("Received Ctrl+C");
    Ok(ShutdownReason::Interrupt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_display() {
        assert_eq!(ShutdownReason::Interrupt.to_string(), "SIGINT");
        assert_eq!(ShutdownReason::Terminate.to_string(), "SIGTERM");
    }
}
