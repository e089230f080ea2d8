// SPDX-License-Identifier: Apache-2.0

//! Error types for Pulse.
//!
//! Uses `thiserror` for deriving `std::error::Error` implementations.
//! Application code should use `anyhow::Result` for top-level error handling.

use thiserror::Error;

/// Errors that can occur while producing or delivering a digest.
#[derive(Error, Debug)]
pub enum PulseError {
    /// No GitHub token could be resolved from any source.
    #[error(
        "Authentication required - set GH_TOKEN or GITHUB_TOKEN, or configure github.token in the config file"
    )]
    NotAuthenticated,

    /// Configuration file or settings error.
    #[error("Configuration error: {message}")]
    Config {
        /// Error message.
        message: String,
    },

    /// A milestone title pattern did not compile.
    #[error("Invalid milestone pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// A command was invoked again in the same channel before its cooldown elapsed.
    #[error("'{command}' was already used recently in {channel}, retry after {retry_after}s")]
    RateLimited {
        /// Command name.
        command: String,
        /// Channel the command was invoked in.
        channel: String,
        /// Seconds until the command may run again.
        retry_after: u64,
    },

    /// The digest run exceeded its wall-clock budget.
    #[error("Digest run timed out after {seconds}s")]
    Timeout {
        /// Budget that was exceeded, in seconds.
        seconds: u64,
    },

    /// Every remote call of a run failed.
    #[error("All {attempted} GitHub requests failed - no digest could be produced")]
    AllRequestsFailed {
        /// Number of requests attempted during the run.
        attempted: usize,
    },

    /// Posting a chunk to the messaging webhook failed.
    #[error("Delivery failed on chunk {chunk} of {total}: {message}")]
    Delivery {
        /// 1-based index of the chunk that failed.
        chunk: usize,
        /// Total number of chunks in the digest.
        total: usize,
        /// Error message.
        message: String,
    },

    /// Network/HTTP error from reqwest.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl From<config::ConfigError> for PulseError {
    fn from(err: config::ConfigError) -> Self {
        PulseError::Config {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_message() {
        let err = PulseError::RateLimited {
            command: "post".to_string(),
            channel: "general".to_string(),
            retry_after: 7,
        };
        assert_eq!(
            err.to_string(),
            "'post' was already used recently in general, retry after 7s"
        );
    }

    #[test]
    fn test_config_error_conversion() {
        let err: PulseError = config::ConfigError::Message("bad value".to_string()).into();
        assert!(matches!(err, PulseError::Config { .. }));
        assert!(err.to_string().contains("bad value"));
    }
}
