//! warptoggle tray entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use warptoggle_client::config::ClientConfig;
use warptoggle_core::{TracingConfig, init_tracing};
use warptoggle_tray::TrayApp;

/// warptoggle-tray - Cloudflare WARP toggle in the system tray
#[derive(Debug, Parser)]
#[command(name = "warptoggle-tray")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(long, short, env = "WARPTOGGLE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    debug: bool,

    /// Program name or path of warp-cli (overrides the config file)
    #[arg(long, env = "WARPTOGGLE_WARP_CLI")]
    warp_cli: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match args.config {
        Some(ref path) => ClientConfig::load_from(path),
        None => ClientConfig::load(),
    };
    let mut config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(warp_cli) = args.warp_cli {
        config.warp.cli_path = warp_cli;
    }

    if let Err(e) = init_tracing(TracingConfig::long_running(args.debug || config.debug)) {
        eprintln!("warning: {}", e);
    }

    let result = match TrayApp::new(&config) {
        Ok(app) => app.run().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
