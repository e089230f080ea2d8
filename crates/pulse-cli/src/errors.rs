// SPDX-License-Identifier: Apache-2.0

//! CLI-specific error formatting with user-friendly hints.
//!
//! Downcasts `anyhow::Error` to `PulseError` and adds hints for the
//! terminal. The library keeps structured error data; presentation lives here.

use anyhow::Error;
use pulse_core::error::PulseError;

/// Message shown when a command is invoked again before its cooldown elapsed.
pub const PLEASE_WAIT: &str = "This command was already used recently, please wait a bit before using it again in this channel.";

/// Returns the cooldown rejection if `error` is one.
///
/// Cooldown rejections are expected and are shown as a notice instead of an
/// error.
pub fn as_rate_limited(error: &Error) -> Option<&PulseError> {
    error
        .downcast_ref::<PulseError>()
        .filter(|e| matches!(e, PulseError::RateLimited { .. }))
}

/// Formats an error for CLI display with helpful hints.
///
/// If the error is not a `PulseError`, returns the error chain.
pub fn format_error(error: &Error) -> String {
    let Some(pulse_err) = error.downcast_ref::<PulseError>() else {
        return format!("{error:#}");
    };

    match pulse_err {
        PulseError::RateLimited { retry_after, .. } => {
            format!("{PLEASE_WAIT} (retry in {retry_after}s)")
        }
        PulseError::NotAuthenticated => format!(
            "{pulse_err}\n\nTip: Run `gh auth login`, or export GH_TOKEN with a personal access token."
        ),
        PulseError::Config { .. } | PulseError::InvalidPattern { .. } => format!(
            "{pulse_err}\n\nTip: Check your config file at {}",
            pulse_core::config::config_file_path().display()
        ),
        PulseError::AllRequestsFailed { .. } => format!(
            "{pulse_err}\n\nTip: Check your GitHub token and network, then run with -v for per-request errors."
        ),
        PulseError::Timeout { .. } => format!(
            "{pulse_err}\n\nTip: Raise digest.run_timeout_seconds or lower digest.max_pages."
        ),
        PulseError::Delivery { .. } => {
            format!("{pulse_err}\n\nTip: Check delivery.webhook_url; earlier chunks were posted.")
        }
        PulseError::Network(_) => {
            format!("{pulse_err}\n\nTip: Check your internet connection and try again.")
        }
    }
}
