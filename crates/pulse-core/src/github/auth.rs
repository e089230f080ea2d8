// SPDX-License-Identifier: Apache-2.0

//! GitHub token resolution and client construction.
//!
//! Token resolution priority chain:
//! 1. `github.token` from the configuration
//! 2. Environment variable (`GH_TOKEN` or `GITHUB_TOKEN`)
//! 3. GitHub CLI (`gh auth token`)

use std::process::Command;

use anyhow::{Context, Result};
use octocrab::Octocrab;
use octocrab::service::middleware::retry::RetryConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::config::GitHubConfig;

/// Source of the GitHub authentication token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenSource {
    /// Token from the configuration file or `PULSE_GITHUB__TOKEN`.
    Config,
    /// Token from `GH_TOKEN` or `GITHUB_TOKEN` environment variable.
    Environment,
    /// Token from `gh auth token` command.
    GhCli,
}

impl std::fmt::Display for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenSource::Config => write!(f, "configuration"),
            TokenSource::Environment => write!(f, "environment variable"),
            TokenSource::GhCli => write!(f, "GitHub CLI"),
        }
    }
}

/// Attempts to get a token from the GitHub CLI (`gh auth token`).
///
/// Returns `None` if `gh` is not installed, not authenticated, or fails.
#[instrument]
fn get_token_from_gh_cli() -> Option<SecretString> {
    debug!("Attempting to get token from gh CLI");

    let output = Command::new("gh").args(["auth", "token"]).output();

    match output {
        Ok(output) if output.status.success() => {
            let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if token.is_empty() {
                debug!("gh auth token returned empty output");
                None
            } else {
                debug!("Successfully retrieved token from gh CLI");
                Some(SecretString::from(token))
            }
        }
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!(
                status = ?output.status,
                stderr = %stderr.trim(),
                "gh auth token failed"
            );
            None
        }
        Err(e) => {
            debug!(error = %e, "Failed to execute gh command");
            None
        }
    }
}

/// Resolves a GitHub token using the priority chain.
///
/// Checks sources in order:
/// 1. `configured` token (from `github.token`)
/// 2. `GH_TOKEN` environment variable
/// 3. `GITHUB_TOKEN` environment variable
/// 4. GitHub CLI (`gh auth token`)
///
/// Returns the token and its source, or `None` if no token is found.
#[instrument(skip(configured))]
pub fn resolve_token(configured: Option<&str>) -> Option<(SecretString, TokenSource)> {
    if let Some(token) = configured
        && !token.is_empty()
    {
        debug!("Using token from configuration");
        return Some((SecretString::from(token.to_string()), TokenSource::Config));
    }

    if let Ok(token) = std::env::var("GH_TOKEN")
        && !token.is_empty()
    {
        debug!("Using token from GH_TOKEN environment variable");
        return Some((SecretString::from(token), TokenSource::Environment));
    }

    if let Ok(token) = std::env::var("GITHUB_TOKEN")
        && !token.is_empty()
    {
        debug!("Using token from GITHUB_TOKEN environment variable");
        return Some((SecretString::from(token), TokenSource::Environment));
    }

    if let Some(token) = get_token_from_gh_cli() {
        debug!("Using token from GitHub CLI");
        return Some((token, TokenSource::GhCli));
    }

    debug!("No token found in any source");
    None
}

/// Creates an authenticated Octocrab client using a provided token.
///
/// The base URI comes from `github.api_url`, so the same client works
/// against GitHub Enterprise.
///
/// # Errors
///
/// Returns an error if the base URI is invalid or the client cannot be built.
#[instrument(skip(token, config), fields(api_url = %config.api_url))]
pub fn create_client_with_token(token: &SecretString, config: &GitHubConfig) -> Result<Octocrab> {
    info!("Creating GitHub client");

    let client = Octocrab::builder()
        .base_uri(config.api_url.as_str())
        .with_context(|| format!("Invalid GitHub API URL: {}", config.api_url))?
        .personal_token(token.expose_secret().to_string())
        // Failed fetches degrade their query group; they are never retried.
        .add_retry_config(RetryConfig::None)
        .build()
        .context("Failed to build GitHub client")?;

    debug!("Created authenticated GitHub client");
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_token_source_display() {
        assert_eq!(TokenSource::Config.to_string(), "configuration");
        assert_eq!(TokenSource::Environment.to_string(), "environment variable");
        assert_eq!(TokenSource::GhCli.to_string(), "GitHub CLI");
    }

    #[test]
    #[serial]
    fn test_configured_token_wins() {
        let (token, source) = resolve_token(Some("from-config")).expect("token");
        assert_eq!(token.expose_secret(), "from-config");
        assert_eq!(source, TokenSource::Config);
    }

    #[test]
    #[serial]
    fn test_gh_token_env_used_when_config_empty() {
        let original = std::env::var("GH_TOKEN").ok();
        unsafe {
            std::env::set_var("GH_TOKEN", "from-env");
        }

        let (token, source) = resolve_token(Some("")).expect("token");
        assert_eq!(token.expose_secret(), "from-env");
        assert_eq!(source, TokenSource::Environment);

        // Cleanup
        unsafe {
            match original {
                Some(val) => std::env::set_var("GH_TOKEN", val),
                None => std::env::remove_var("GH_TOKEN"),
            }
        }
    }

    #[tokio::test]
    async fn test_create_client_with_custom_api_url() {
        let config = GitHubConfig {
            api_url: "http://127.0.0.1:9".to_string(),
            ..GitHubConfig::default()
        };
        let token = SecretString::from("t".to_string());
        assert!(create_client_with_token(&token, &config).is_ok());
    }
}
