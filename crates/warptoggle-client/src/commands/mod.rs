//! Subcommand implementations.

pub mod action;
pub mod config;
pub mod status;
pub mod watch;

#[cfg(test)]
pub(crate) mod fake;
