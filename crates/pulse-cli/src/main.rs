// SPDX-License-Identifier: Apache-2.0

//! Pulse - daily digest of GitHub milestone activity.
//!
//! Collects issues and pull requests closed or reopened in active milestones
//! and posts them, grouped by topic, to a chat channel.

mod cli;
mod commands;
mod errors;
mod logging;
mod output;
mod provider;
mod schedule;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use pulse_core::config;
use tracing::debug;

use crate::cli::{Cli, Commands, OutputContext};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, matches!(cli.command, Commands::Serve));

    let output_ctx = OutputContext::from_cli(cli.output, cli.quiet, cli.verbose);

    let config = config::load_config().context("Failed to load configuration")?;
    debug!("Configuration loaded successfully");

    let command = cli.command.name();
    match commands::run(cli.command, output_ctx, &config).await {
        Ok(()) => Ok(()),
        Err(e) if errors::as_rate_limited(&e).is_some() => {
            debug!(command, "Rejected by cooldown");
            eprintln!("{}", style(errors::format_error(&e)).yellow());
            Ok(())
        }
        Err(e) => {
            let formatted = errors::format_error(&e);
            eprintln!("Error: {formatted}");
            Err(e)
        }
    }
}
