//! Mosaic - annotation checker entry point
//!
//! Parses annotation lines and runs generator plugins over a source model,
//! printing the decoded configuration and the diagnostics it produced.

mod cli;
mod config;
mod logging;
mod report;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use crate::cli::Cli;
use crate::config::Config;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "Starting mosaic");

    cli::run(cli.command, &config)
}
