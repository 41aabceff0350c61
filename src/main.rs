//! Lend-a-Read - terminal client
//!
//! Browse the community catalog, lend and borrow books with your neighbours.

use lend_a_read::cli::{self, Cli, Context};
use lend_a_read::core;

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration (handles CLI args, env vars, and config file)
    let config = match core::config::Config::load(&cli.args) {
        Ok(cfg) => cfg,
        Err(e) => {
            // Print error to stderr since logging isn't initialized yet
            eprintln!("Failed to load configuration: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let _logger = match core::Logger::init(&config.logging) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    info!("Starting Lend-a-Read v{}", lend_a_read::VERSION);
    debug!(
        api = %config.api.base_url,
        data_dir = ?config.storage.data_dir,
        "Configuration loaded"
    );

    let ctx = Context::open(config).await?;

    match cli::run(&ctx, cli.command).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("{}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}
