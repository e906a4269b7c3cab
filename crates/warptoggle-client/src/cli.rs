//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use warptoggle_core::TracingConfig;

use crate::config::ClientConfig;

/// warptoggle - Cloudflare WARP status and toggle
#[derive(Debug, Parser)]
#[command(name = "warptoggle")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "WARPTOGGLE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Program name or path of warp-cli (overrides the config file)
    #[arg(long, env = "WARPTOGGLE_WARP_CLI", global = true)]
    pub warp_cli: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Loads the configuration and applies command-line overrides.
    pub fn load_config(&self) -> Result<ClientConfig, crate::config::ConfigError> {
        let mut config = match self.config {
            Some(ref path) => ClientConfig::load_from(path)?,
            None => ClientConfig::load()?,
        };

        if let Some(ref warp_cli) = self.warp_cli {
            config.warp.cli_path = warp_cli.clone();
        }
        config.debug |= self.debug;

        Ok(config)
    }

    /// Picks the tracing preset for the command, honouring `debug` from
    /// either the flag or the loaded configuration.
    pub fn tracing_config(&self, config: &ClientConfig) -> TracingConfig {
        let debug = self.debug || config.debug;
        if matches!(self.command, Some(Command::Watch { .. })) {
            TracingConfig::long_running(debug)
        } else {
            TracingConfig::cli(debug)
        }
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the WARP connection status (default)
    Status {
        /// Output a JSON report
        #[arg(long)]
        json: bool,
    },

    /// Connect and report the settled state
    Connect,

    /// Disconnect and report the settled state
    Disconnect,

    /// Connect when disconnected, disconnect when connected
    Toggle,

    /// Poll in the foreground and print every state change
    Watch {
        /// Poll interval in seconds (overrides the config file)
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}
