//! warptoggle CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use warptoggle_client::cli::{Cli, Command, ConfigAction};
use warptoggle_client::commands::action::{self, Action};
use warptoggle_client::config::ClientConfig;
use warptoggle_client::error::ClientResult;
use warptoggle_client::{commands, signals};
use warptoggle_core::{StatusPoller, init_tracing};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Loaded before tracing so `debug = true` in the file takes effect.
    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing(cli.tracing_config(&config)) {
        eprintln!("warning: {}", e);
    }
    debug!(?config, "Loaded configuration");

    match run(cli, config).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: ClientConfig) -> ClientResult<ExitCode> {
    let command = cli.command.unwrap_or(Command::Status { json: false });

    match command {
        Command::Status { json } => commands::status::run(&poller(&config)?, json).await,
        Command::Connect => action::run(&poller(&config)?, Action::Connect).await,
        Command::Disconnect => action::run(&poller(&config)?, Action::Disconnect).await,
        Command::Toggle => action::run(&poller(&config)?, Action::Toggle).await,
        Command::Watch { interval } => {
            let mut config = config;
            if let Some(secs) = interval {
                config.poller.interval_secs = secs.max(1);
            }
            commands::watch::run(&poller(&config)?, signals::wait_for_shutdown()).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Config { action } => {
            match action {
                ConfigAction::Dump => commands::config::dump(&config)?,
                ConfigAction::Validate => commands::config::validate(&config)?,
                ConfigAction::Path => commands::config::path()?,
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn poller(config: &ClientConfig) -> ClientResult<StatusPoller> {
    config.validate()?;
    Ok(config.build_poller())
}
