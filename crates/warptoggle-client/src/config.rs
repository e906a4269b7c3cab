//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/warptoggle/config.toml` by default. A missing file means
//! defaults; every key is optional.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use warptoggle_core::{PollerConfig, StatusPoller, WarpCli};

/// Errors raised while loading or checking the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for warptoggle front-ends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Debug logging.
    pub debug: bool,

    /// How to run `warp-cli`.
    pub warp: WarpSettings,

    /// Polling and settle timing.
    pub poller: PollerSettings,

    /// Tray appearance and behaviour.
    pub tray: TraySettings,
}

/// `warp-cli` invocation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarpSettings {
    /// Program name or absolute path of `warp-cli`.
    pub cli_path: String,

    /// Seconds `warp-cli status` may take before the check counts as failed.
    pub status_timeout_secs: u64,
}

impl Default for WarpSettings {
    fn default() -> Self {
        Self {
            cli_path: "warp-cli".to_string(),
            status_timeout_secs: WarpCli::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

/// Poller timing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollerSettings {
    /// Seconds between background status checks.
    pub interval_secs: u64,

    /// Seconds to wait after connect/disconnect before re-checking.
    pub settle_delay_secs: u64,
}

impl Default for PollerSettings {
    fn default() -> Self {
        let defaults = PollerConfig::default();
        Self {
            interval_secs: defaults.interval.as_secs(),
            settle_delay_secs: defaults.settle_delay.as_secs(),
        }
    }
}

/// Tray settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraySettings {
    /// Title of the tray item and of its toggle entry.
    pub title: String,

    /// Icon name shown while connected.
    pub connected_icon: String,

    /// Icon name shown while disconnected.
    pub disconnected_icon: String,

    /// Send a desktop notification when a toggle settles.
    pub notify: bool,
}

impl Default for TraySettings {
    fn default() -> Self {
        Self {
            title: "Cloudflare WARP".to_string(),
            connected_icon: "weather-cloudy-symbolic".to_string(),
            disconnected_icon: "network-vpn-disconnected-symbolic".to_string(),
            notify: false,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the default path, or defaults if it is missing.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks values that would make the poller misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.warp.cli_path.trim().is_empty() {
            return Err(ConfigError::Invalid("warp.cli_path must not be empty".into()));
        }
        if self.warp.status_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "warp.status_timeout_secs must be at least 1".into(),
            ));
        }
        if self.poller.interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "poller.interval_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Returns the poller timing derived from the settings.
    pub fn poller_config(&self) -> PollerConfig {
        PollerConfig::new(Duration::from_secs(self.poller.interval_secs))
            .with_settle_delay(Duration::from_secs(self.poller.settle_delay_secs))
    }

    /// Returns a `warp-cli` runner built from the settings.
    pub fn warp_cli(&self) -> WarpCli {
        WarpCli::new(self.warp.cli_path.clone())
            .with_timeout(Duration::from_secs(self.warp.status_timeout_secs))
    }

    /// Builds a poller wired to the real `warp-cli`.
    pub fn build_poller(&self) -> StatusPoller {
        StatusPoller::new(Arc::new(self.warp_cli()), self.poller_config())
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("warptoggle")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert!(!config.debug);
        assert_eq!(config.warp.cli_path, "warp-cli");
        assert_eq!(config.warp.status_timeout_secs, 10);
        assert_eq!(config.poller.interval_secs, 30);
        assert_eq!(config.poller.settle_delay_secs, 3);
        assert_eq!(config.tray.connected_icon, "weather-cloudy-symbolic");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
debug = true

[poller]
interval_secs = 60

[warp]
cli_path = "/usr/local/bin/warp-cli"
"#
        )
        .unwrap();

        let config = ClientConfig::load_from(file.path()).unwrap();
        assert!(config.debug);
        assert_eq!(config.poller.interval_secs, 60);
        assert_eq!(config.poller.settle_delay_secs, 3);
        assert_eq!(config.warp.cli_path, "/usr/local/bin/warp-cli");
        assert_eq!(config.tray, TraySettings::default());
    }

    #[test]
    fn load_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClientConfig::load_from(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn load_garbage_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[poller\ninterval_secs = ").unwrap();

        let err = ClientConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn toml_round_trip() {
        let mut config = ClientConfig::default();
        config.tray.notify = true;
        config.poller.settle_delay_secs = 5;

        let rendered = config.to_toml().unwrap();
        let parsed: ClientConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = ClientConfig::default();
        config.poller.interval_secs = 0;
        assert!(config.validate().is_err());

        let mut config = ClientConfig::default();
        config.warp.cli_path = "  ".into();
        assert!(config.validate().is_err());

        let mut config = ClientConfig::default();
        config.warp.status_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn derived_runtime_settings() {
        let mut config = ClientConfig::default();
        config.poller.interval_secs = 45;
        config.poller.settle_delay_secs = 0;
        config.warp.status_timeout_secs = 2;

        let poller = config.poller_config();
        assert_eq!(poller.interval, Duration::from_secs(45));
        assert_eq!(poller.settle_delay, Duration::ZERO);

        let cli = config.warp_cli();
        assert_eq!(cli.timeout(), Duration::from_secs(2));
    }

    #[test]
    fn default_path_format() {
        let path = ClientConfig::default_path();
        assert!(path.ends_with("warptoggle/config.toml"));
    }
}
