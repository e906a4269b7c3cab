//! Running `warp-cli`.
//!
//! The poller never talks to [`tokio::process`] directly: it goes through the
//! [`CommandRunner`] trait so tests can script exit codes and output.

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::error::{StatusError, StatusResult};

/// A boxed future for async trait methods, so runners stay object-safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The `warp-cli` subcommands this crate issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarpCommand {
    Status,
    Connect,
    Disconnect,
}

impl WarpCommand {
    /// The subcommand argument passed to `warp-cli`.
    pub fn as_arg(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Connect => "connect",
            Self::Disconnect => "disconnect",
        }
    }
}

impl std::fmt::Display for WarpCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_arg())
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Creates an output with the given exit code and stdout.
    pub fn new(exit_code: i32, stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Builder: set stderr.
    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = stderr.into();
        self
    }

    /// Returns true if the process exited with status 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Something that can run `warp-cli` subcommands.
///
/// # Implementation Notes
///
/// - `output` waits for the process and captures stdout/stderr; it is only
///   used for [`WarpCommand::Status`].
/// - `spawn` starts the process and returns as soon as it is running. The
///   caller never sees its exit status.
pub trait CommandRunner: Send + Sync {
    /// Human-readable program name, used in logs and errors.
    fn program(&self) -> &str;

    /// Runs the command to completion and captures its output.
    fn output(&self, command: WarpCommand) -> BoxFuture<'_, StatusResult<CommandOutput>>;

    /// Starts the command without waiting for it.
    fn spawn(&self, command: WarpCommand) -> io::Result<()>;
}

/// [`CommandRunner`] backed by the real `warp-cli` binary.
#[derive(Debug, Clone)]
pub struct WarpCli {
    program: String,
    timeout: Duration,
}

impl Default for WarpCli {
    fn default() -> Self {
        Self::new("warp-cli")
    }
}

impl WarpCli {
    /// Default time allowed for `warp-cli status` to answer.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a runner for the given program path or name.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Builder: set the status timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the configured status timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn command(&self, command: WarpCommand) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(command.as_arg()).stdin(Stdio::null());
        cmd
    }
}

impl CommandRunner for WarpCli {
    fn program(&self) -> &str {
        &self.program
    }

    fn output(&self, command: WarpCommand) -> BoxFuture<'_, StatusResult<CommandOutput>> {
        Box::pin(async move {
            debug!(program = %self.program, %command, "running");

            let mut cmd = self.command(command);
            cmd.kill_on_drop(true);

            let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
                Ok(Ok(output)) => output,
                Ok(Err(e)) => return Err(StatusError::spawn(&self.program, e)),
                Err(_) => {
                    return Err(StatusError::Timeout {
                        program: self.program.clone(),
                        timeout: self.timeout,
                    });
                }
            };

            let output = CommandOutput {
                exit_code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            };
            debug!(
                program = %self.program,
                %command,
                exit_code = ?output.exit_code,
                "finished"
            );
            Ok(output)
        })
    }

    fn spawn(&self, command: WarpCommand) -> io::Result<()> {
        debug!(program = %self.program, %command, "spawning");

        let mut child = self
            .command(command)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        // Reap the child in the background; the exit status is informational only.
        let program = self.program.clone();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) => debug!(%program, %command, %status, "action finished"),
                Err(e) => debug!(%program, %command, error = %e, "failed to wait for action"),
            }
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_args() {
        assert_eq!(WarpCommand::Status.as_arg(), "status");
        assert_eq!(WarpCommand::Connect.to_string(), "connect");
        assert_eq!(WarpCommand::Disconnect.to_string(), "disconnect");
    }

    #[test]
    fn output_success() {
        assert!(CommandOutput::new(0, "").success());
        assert!(!CommandOutput::new(1, "").success());
        assert!(!CommandOutput::default().success());
    }

    #[test]
    fn warp_cli_defaults() {
        let cli = WarpCli::default();
        assert_eq!(cli.program(), "warp-cli");
        assert_eq!(cli.timeout(), WarpCli::DEFAULT_TIMEOUT);

        let cli = WarpCli::new("/opt/warp/bin/warp-cli").with_timeout(Duration::from_secs(2));
        assert_eq!(cli.program(), "/opt/warp/bin/warp-cli");
        assert_eq!(cli.timeout(), Duration::from_secs(2));
    }

    #[tokio::test]
    async fn missing_binary_is_a_spawn_error() {
        let cli = WarpCli::new("/nonexistent/warptoggle-test/warp-cli");
        let result = cli.output(WarpCommand::Status).await;
        assert!(matches!(result, Err(StatusError::Spawn { .. })));

        assert!(cli.spawn(WarpCommand::Connect).is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn captures_exit_code_and_stdout() {
        // `echo status` prints the subcommand back and exits 0.
        let cli = WarpCli::new("echo");
        let output = cli.output(WarpCommand::Status).await.unwrap();
        assert!(output.success());
        assert_eq!(output.stdout.trim(), "status");

        // `false` ignores its argument and exits 1.
        let cli = WarpCli::new("false");
        let output = cli.output(WarpCommand::Status).await.unwrap();
        assert_eq!(output.exit_code, Some(1));
    }
}
