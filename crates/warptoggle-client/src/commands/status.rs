//! `warptoggle status`.

use std::process::ExitCode;

use chrono::{DateTime, Utc};
use serde::Serialize;
use warptoggle_core::{ConnectionState, StatusPoller, ToggleState};

use crate::error::ClientResult;

/// What `status --json` prints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub state: ConnectionState,
    pub connected: bool,
    pub checked_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl From<&ToggleState> for StatusReport {
    fn from(state: &ToggleState) -> Self {
        Self {
            state: state.connection,
            connected: state.connected(),
            checked_at: state.last_checked,
            error: state.last_error.clone(),
        }
    }
}

impl StatusReport {
    /// Renders the report as one line of text or pretty JSON.
    pub fn render(&self, json: bool) -> ClientResult<String> {
        if json {
            return Ok(serde_json::to_string_pretty(self)?);
        }
        Ok(match self.error {
            Some(ref error) => format!("{} ({})", self.state, error),
            None => self.state.to_string(),
        })
    }
}

/// Exit code convention for scripts: 0 when connected.
pub fn exit_code(state: ConnectionState) -> ExitCode {
    if state.is_connected() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Runs one status check and prints the result.
pub async fn run(poller: &StatusPoller, json: bool) -> ClientResult<ExitCode> {
    let connection = poller.check_status().await;
    let report = StatusReport::from(&poller.state());
    println!("{}", report.render(json)?);
    Ok(exit_code(connection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fake::{CONNECTED, FakeWarp};
    use chrono::TimeZone;
    use warptoggle_core::CommandOutput;

    fn report(connection: ConnectionState, error: Option<&str>) -> StatusReport {
        StatusReport {
            state: connection,
            connected: connection.is_connected(),
            checked_at: Some(Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap()),
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn text_rendering() {
        let text = report(ConnectionState::Connected, None).render(false).unwrap();
        assert_eq!(text, "Connected");

        let text = report(
            ConnectionState::Disconnected,
            Some("warp-cli exited with status 1: daemon not running"),
        )
        .render(false)
        .unwrap();
        assert_eq!(
            text,
            "Disconnected (warp-cli exited with status 1: daemon not running)"
        );
    }

    #[test]
    fn json_report_shape() {
        insta::assert_json_snapshot!(report(ConnectionState::Connected, None), @r#"
        {
          "state": "connected",
          "connected": true,
          "checked_at": "2026-10-19T08:30:00Z",
          "error": null
        }
        "#);
    }

    #[tokio::test]
    async fn run_reports_connected() {
        let warp = FakeWarp::reporting(CONNECTED);
        let poller = warp.poller();

        let code = run(&poller, false).await.unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
        assert!(poller.state().connected());
    }

    #[tokio::test]
    async fn run_reports_failure_as_disconnected() {
        let warp = FakeWarp::reporting("");
        warp.set_status(CommandOutput::new(1, ""));
        let poller = warp.poller();

        let code = run(&poller, true).await.unwrap();
        assert_eq!(code, ExitCode::FAILURE);

        let report = StatusReport::from(&poller.state());
        assert!(!report.connected);
        assert!(report.error.is_some());
    }
}
