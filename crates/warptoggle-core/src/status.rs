//! Connection state and `warp-cli status` output parsing.

use serde::{Deserialize, Serialize};

use crate::command::CommandOutput;
use crate::error::{StatusError, StatusResult};

/// Substring whose presence in `warp-cli status` output means "connected".
pub const CONNECTED_MARKER: &str = "Status update: Connected";

/// Prefix of every well-formed status line, connected or not.
const STATUS_LINE_PREFIX: &str = "Status update:";

/// Whether the WARP tunnel is up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
}

impl ConnectionState {
    /// Returns true for [`ConnectionState::Connected`].
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }

    /// The state a toggle should move to from this one.
    pub fn toggled(self) -> Self {
        match self {
            Self::Connected => Self::Disconnected,
            Self::Disconnected => Self::Connected,
        }
    }
}

impl From<bool> for ConnectionState {
    fn from(connected: bool) -> Self {
        if connected {
            Self::Connected
        } else {
            Self::Disconnected
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connected => f.write_str("Connected"),
            Self::Disconnected => f.write_str("Disconnected"),
        }
    }
}

/// Interprets the output of `warp-cli status`.
///
/// Connected requires exit code 0 *and* the marker in stdout. Exit 0 with a
/// status line that is not the marker (`Disconnected`, `Connecting`, ...)
/// is a clean Disconnected. Exit 0 without any status line is reported as
/// [`StatusError::Ambiguous`] so the caller can log it.
pub fn parse_status(program: &str, output: &CommandOutput) -> StatusResult<ConnectionState> {
    if !output.success() {
        return Err(StatusError::non_zero_exit(
            program,
            output.exit_code,
            &output.stderr,
        ));
    }

    if output.stdout.contains(CONNECTED_MARKER) {
        Ok(ConnectionState::Connected)
    } else if output.stdout.contains(STATUS_LINE_PREFIX) {
        Ok(ConnectionState::Disconnected)
    } else {
        Err(StatusError::ambiguous(&output.stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(output: &CommandOutput) -> StatusResult<ConnectionState> {
        parse_status("warp-cli", output)
    }

    #[test]
    fn connected_marker_with_success() {
        let output = CommandOutput::new(0, "Status update: Connected\n");
        assert_eq!(parse(&output).unwrap(), ConnectionState::Connected);
    }

    #[test]
    fn marker_inside_longer_output() {
        let output = CommandOutput::new(
            0,
            "Success\nStatus update: Connected\nNetwork: healthy\n",
        );
        assert_eq!(parse(&output).unwrap(), ConnectionState::Connected);
    }

    #[test]
    fn disconnected_line() {
        let output = CommandOutput::new(0, "Status update: Disconnected\nReason: Manual\n");
        assert_eq!(parse(&output).unwrap(), ConnectionState::Disconnected);
    }

    #[test]
    fn transitional_states_are_disconnected() {
        for line in [
            "Status update: Connecting\n",
            "Status update: Disconnecting\n",
            "Status update: connected\n",
        ] {
            let output = CommandOutput::new(0, line);
            assert_eq!(
                parse(&output).unwrap(),
                ConnectionState::Disconnected,
                "{line:?}"
            );
        }
    }

    #[test]
    fn non_zero_exit_is_an_error_even_with_marker() {
        let output = CommandOutput::new(1, "Status update: Connected\n");
        assert!(matches!(
            parse(&output),
            Err(StatusError::NonZeroExit { code: Some(1), .. })
        ));

        let output = CommandOutput::new(1, "").with_stderr("Error communicating with daemon");
        match parse(&output) {
            Err(StatusError::NonZeroExit { stderr, .. }) => {
                assert_eq!(stderr, "Error communicating with daemon");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn signal_termination_is_an_error() {
        let output = CommandOutput {
            exit_code: None,
            stdout: CONNECTED_MARKER.to_string(),
            stderr: String::new(),
        };
        assert!(parse(&output).is_err());
    }

    #[test]
    fn missing_status_line_is_ambiguous() {
        let output = CommandOutput::new(0, "");
        assert!(matches!(parse(&output), Err(StatusError::Ambiguous { .. })));

        let output = CommandOutput::new(0, "Registration missing\n");
        assert!(matches!(parse(&output), Err(StatusError::Ambiguous { .. })));
    }

    #[test]
    fn state_helpers() {
        assert!(ConnectionState::Connected.is_connected());
        assert!(!ConnectionState::default().is_connected());
        assert_eq!(
            ConnectionState::Connected.toggled(),
            ConnectionState::Disconnected
        );
        assert_eq!(ConnectionState::from(true), ConnectionState::Connected);
        assert_eq!(ConnectionState::Disconnected.to_string(), "Disconnected");
    }

    #[test]
    fn state_serializes_lowercase() {
        let json = serde_json::to_string(&ConnectionState::Connected).unwrap();
        assert_eq!(json, "\"connected\"");
    }
}
