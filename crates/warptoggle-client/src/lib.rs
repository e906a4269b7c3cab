//! CLI, configuration, one-shot and watch commands
//!
//! This crate provides the `warptoggle` command-line interface and the
//! configuration shared with the tray front-end.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod signals;

pub use cli::Cli;
pub use config::{ClientConfig, ConfigError};
pub use error::{ClientError, ClientResult};
