//! Status check error types.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Result type for status queries.
pub type StatusResult<T> = Result<T, StatusError>;

/// Why a `warp-cli status` call did not produce a usable answer.
///
/// Every variant is recovered the same way by the poller: the failure is
/// logged and the connection is treated as down.
#[derive(Debug, Error)]
pub enum StatusError {
    /// The process could not be started (missing binary, permissions, ...).
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The process ran but exited unsuccessfully.
    #[error("{program} exited with {}: {stderr}", describe_exit(.code))]
    NonZeroExit {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The process did not finish within the status timeout.
    #[error("{program} did not answer within {}s", .timeout.as_secs())]
    Timeout { program: String, timeout: Duration },

    /// Exit status was fine but the output has no status line.
    #[error("unrecognised status output: {output:?}")]
    Ambiguous { output: String },
}

impl StatusError {
    /// Creates a spawn error.
    pub fn spawn(program: impl Into<String>, source: io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }

    /// Creates a non-zero exit error.
    pub fn non_zero_exit(program: impl Into<String>, code: Option<i32>, stderr: &str) -> Self {
        Self::NonZeroExit {
            program: program.into(),
            code,
            stderr: stderr.trim().to_string(),
        }
    }

    /// Creates an ambiguous output error.
    pub fn ambiguous(output: &str) -> Self {
        Self::Ambiguous {
            output: output.trim().to_string(),
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no exit code (killed by signal)".to_string(),
    }
}
