// SPDX-License-Identifier: Apache-2.0

//! Logging initialization for the Pulse CLI.
//!
//! Uses `tracing` with `tracing-subscriber` for structured logging to stderr.
//! The `RUST_LOG` environment variable overrides the defaults.
//!
//! # Examples
//!
//! ```bash
//! # Default: warnings only
//! pulse digest
//!
//! # Per-request detail
//! RUST_LOG=pulse=debug pulse digest
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Default directives for one-shot commands.
const QUIET_FILTER: &str = "pulse=warn,octocrab=error,reqwest=error";

/// Default directives for the long-running scheduler.
const SERVE_FILTER: &str = "pulse=info,octocrab=error,reqwest=error";

/// Default directives with `-v`.
const VERBOSE_FILTER: &str = "pulse=debug,octocrab=warn,reqwest=warn";

/// Picks the default filter directives.
pub fn default_filter(verbose: bool, serve: bool) -> &'static str {
    if verbose {
        VERBOSE_FILTER
    } else if serve {
        SERVE_FILTER
    } else {
        QUIET_FILTER
    }
}

/// Initialize the logging subsystem.
///
/// # Arguments
///
/// * `verbose` - Whether `-v` was given
/// * `serve` - Whether the scheduler is starting (logs each run at info)
pub fn init_logging(verbose: bool, serve: bool) {
    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(verbose, serve)))
        .expect("valid default filter directives");

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_selection() {
        assert_eq!(default_filter(false, false), QUIET_FILTER);
        assert_eq!(default_filter(false, true), SERVE_FILTER);
        assert_eq!(default_filter(true, true), VERBOSE_FILTER);
    }

    #[test]
    fn test_default_filters_parse() {
        for directives in [QUIET_FILTER, SERVE_FILTER, VERBOSE_FILTER] {
            assert!(EnvFilter::try_new(directives).is_ok());
        }
    }
}
