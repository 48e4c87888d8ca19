//! Programme portal - upload server for department programme documents

#![allow(missing_docs)]

use clap::Parser;
use programme_portal::config::{Config, DEFAULT_CONFIG_PATH};
use programme_portal::{server, utils};
use std::path::PathBuf;
use std::process::ExitCode;

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "portal", version, about)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "PORTAL_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Validate the configuration and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match Config::load(&cli.config).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = utils::logging::init_tracing(config.logging()) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    if cli.check {
        println!("Configuration OK: {}", cli.config.display());
        return ExitCode::SUCCESS;
    }

    match server::builder::run_with_config(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Display keeps the multi-line bind error readable
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
