// SPDX-License-Identifier: Apache-2.0

//! Command-line interface definition for Pulse.
//!
//! Uses clap's derive API for declarative CLI parsing.

use std::io::IsTerminal;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for CLI results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text (default)
    #[default]
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// YAML output for programmatic consumption
    Yaml,
}

/// Global output configuration passed to commands.
#[derive(Clone, Debug)]
pub struct OutputContext {
    /// Output format (text, json, yaml)
    pub format: OutputFormat,
    /// Suppress non-essential output (spinners, progress)
    pub quiet: bool,
    /// Enable verbose output (debug-level logging)
    pub verbose: bool,
    /// Whether stdout is a terminal (TTY)
    pub is_tty: bool,
}

impl OutputContext {
    /// Creates an `OutputContext` from CLI arguments.
    pub fn from_cli(format: OutputFormat, quiet: bool, verbose: bool) -> Self {
        Self {
            format,
            quiet,
            verbose,
            is_tty: std::io::stdout().is_terminal(),
        }
    }

    /// Returns true if interactive elements (spinners, colors) should be shown.
    pub fn is_interactive(&self) -> bool {
        self.is_tty && !self.quiet && matches!(self.format, OutputFormat::Text)
    }
}

/// Pulse - daily digest of GitHub milestone activity.
///
/// Collects issues and pull requests that were closed or reopened in active
/// milestones, groups them by topic, and renders message-sized chunks for a
/// chat channel.
#[derive(Parser)]
#[command(name = "pulse")]
#[command(version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Output format (text, json, yaml)
    #[arg(long, short = 'o', global = true, default_value = "text", value_enum)]
    pub output: OutputFormat,

    /// Suppress non-essential output (spinners, progress)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug-level logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Produce the digest and print its chunks
    Digest {
        /// Look-back window in hours (overrides digest.lookback_hours)
        #[arg(long)]
        hours: Option<u64>,
    },

    /// Produce the digest and post it to the configured webhook
    Post {
        /// Look-back window in hours (overrides digest.lookback_hours)
        #[arg(long)]
        hours: Option<u64>,

        /// Channel name used for the cooldown (overrides delivery.channel)
        #[arg(long)]
        channel: Option<String>,

        /// Produce the digest but do not post it
        #[arg(long)]
        dry_run: bool,
    },

    /// Run the scheduler, posting a digest at every cron occurrence
    Serve,

    /// List active milestones with their completion
    Milestones {
        /// Look-back window in hours (overrides digest.lookback_hours)
        #[arg(long)]
        hours: Option<u64>,
    },
}

impl Commands {
    /// Name used for cooldown bookkeeping and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Digest { .. } => "digest",
            Commands::Post { .. } => "post",
            Commands::Serve => "serve",
            Commands::Milestones { .. } => "milestones",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_post_flags() {
        let cli = Cli::try_parse_from([
            "pulse",
            "post",
            "--hours",
            "48",
            "--channel",
            "releases",
            "--dry-run",
        ])
        .unwrap();
        match cli.command {
            Commands::Post {
                hours,
                channel,
                dry_run,
            } => {
                assert_eq!(hours, Some(48));
                assert_eq!(channel.as_deref(), Some("releases"));
                assert!(dry_run);
            }
            _ => panic!("expected post"),
        }
    }

    #[test]
    fn test_global_output_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["pulse", "digest", "-o", "json"]).unwrap();
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.command.name(), "digest");
    }

    #[test]
    fn test_is_interactive_requires_text_tty() {
        let ctx = OutputContext {
            format: OutputFormat::Json,
            quiet: false,
            verbose: false,
            is_tty: true,
        };
        assert!(!ctx.is_interactive());

        let ctx = OutputContext {
            format: OutputFormat::Text,
            quiet: false,
            verbose: false,
            is_tty: true,
        };
        assert!(ctx.is_interactive());
    }
}
