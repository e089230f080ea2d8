// SPDX-License-Identifier: Apache-2.0

//! Command handlers for Pulse CLI.

pub mod digest;
pub mod milestones;
pub mod post;
pub mod serve;
pub mod types;

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use pulse_core::{AppConfig, DigestConfig, OctocrabApi, gate::gate_file_path};
use tracing::debug;

use crate::cli::{Commands, OutputContext};
use crate::output;
use crate::provider::CliTokenProvider;

/// Creates a styled spinner (only if interactive).
fn maybe_spinner(ctx: &OutputContext, message: &str) -> Option<ProgressBar> {
    if ctx.is_interactive() {
        let s = ProgressBar::new_spinner();
        s.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("Invalid spinner template"),
        );
        s.set_message(message.to_string());
        s.enable_steady_tick(Duration::from_millis(100));
        Some(s)
    } else {
        None
    }
}

/// Builds the GitHub client, resolving the token through the CLI chain.
fn build_api(config: &AppConfig) -> Result<OctocrabApi> {
    let provider = CliTokenProvider::new(config.github.token.clone());
    let api = OctocrabApi::from_config(&provider, &config.github)
        .context("Failed to create GitHub client")?;
    Ok(api)
}

/// Digest settings with the `--hours` override applied.
fn settings_with_hours(config: &AppConfig, hours: Option<u64>) -> DigestConfig {
    let mut settings = config.digest.clone();
    if let Some(hours) = hours {
        debug!(hours, "Overriding look-back window");
        settings.lookback_hours = hours;
    }
    settings
}

/// Dispatch to the appropriate command handler.
pub async fn run(command: Commands, ctx: OutputContext, config: &AppConfig) -> Result<()> {
    match command {
        Commands::Digest { hours } => {
            let settings = settings_with_hours(config, hours);
            let api = build_api(config)?;
            let spinner = maybe_spinner(&ctx, "Collecting milestone activity...");
            let result = digest::run(&api, &settings, Utc::now()).await;
            if let Some(s) = spinner {
                s.finish_and_clear();
            }
            output::render(&result?, &ctx)
        }

        Commands::Post {
            hours,
            channel,
            dry_run,
        } => {
            let settings = settings_with_hours(config, hours);
            let channel = channel.unwrap_or_else(|| config.delivery.channel.clone());
            let gate_path = gate_file_path();

            // Reject repeated invocations before touching the network.
            post::check_cooldown(config, &gate_path, &channel, Utc::now())?;

            let api = build_api(config)?;
            let spinner = maybe_spinner(&ctx, "Producing and posting digest...");
            let request = post::PostRequest {
                settings: &settings,
                channel: &channel,
                dry_run,
                gate_path: &gate_path,
            };
            let result = post::run(&api, config, request).await;
            if let Some(s) = spinner {
                s.finish_and_clear();
            }
            output::render(&result?, &ctx)
        }

        Commands::Serve => {
            let api = build_api(config)?;
            serve::run(&api, config).await
        }

        Commands::Milestones { hours } => {
            let settings = settings_with_hours(config, hours);
            let api = build_api(config)?;
            let spinner = maybe_spinner(&ctx, "Listing milestones...");
            let result = milestones::run(&api, &settings, Utc::now()).await;
            if let Some(s) = spinner {
                s.finish_and_clear();
            }
            output::render(&result?, &ctx)
        }
    }
}
