// SPDX-License-Identifier: Apache-2.0

//! Configuration management for Pulse.
//!
//! Provides layered configuration from files and environment variables.
//! Uses XDG-compliant paths with environment variable support.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables (prefix: `PULSE_`)
//! 2. Config file: `~/.config/pulse/config.toml`
//! 3. Built-in defaults
//!
//! # Examples
//!
//! ```bash
//! # Widen the look-back window via environment variable
//! PULSE_DIGEST__LOOKBACK_HOURS=48 pulse digest
//! ```

use std::path::PathBuf;

use chrono::NaiveDate;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::PulseError;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// GitHub API settings.
    pub github: GitHubConfig,
    /// Digest content and fetch limits.
    pub digest: DigestConfig,
    /// Scheduler settings for `pulse serve`.
    pub schedule: ScheduleConfig,
    /// Webhook delivery settings.
    pub delivery: DeliveryConfig,
    /// Command cooldown settings.
    pub gate: GateConfig,
}

/// GitHub API settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Base URL of the REST API.
    pub api_url: String,
    /// Personal access token. Falls back to `GH_TOKEN`, `GITHUB_TOKEN`, then `gh auth token`.
    pub token: Option<String>,
    /// Per-request timeout in seconds.
    pub api_timeout_seconds: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            token: None,
            api_timeout_seconds: 10,
        }
    }
}

/// One repository watched by the digest.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Repository in `owner/name` format.
    pub repo: String,
    /// Section heading rendered above this repository's milestones.
    pub heading: String,
    /// Regex a milestone title must match to be reported.
    #[serde(default = "default_milestone_pattern")]
    pub milestone_pattern: String,
}

fn default_milestone_pattern() -> String {
    r"^4\.".to_string()
}

/// Digest content and fetch limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    /// Repositories, rendered in this order.
    pub repositories: Vec<RepositoryConfig>,
    /// Look-back window in hours.
    pub lookback_hours: u64,
    /// Maximum number of search pages per query group.
    pub max_pages: u32,
    /// Search results per page (GitHub caps this at 100).
    pub per_page: u8,
    /// Message size ceiling in characters; every chunk stays strictly below it.
    pub max_message_chars: usize,
    /// Maximum number of query groups fetched concurrently.
    pub concurrency: usize,
    /// Wall-clock budget for one run, in seconds.
    pub run_timeout_seconds: u64,
    /// Emoji or badge placed after the day counter.
    pub badge: String,
    /// Second header line.
    pub waiting_line: String,
    /// Date of the last release; drives the "Day N" counter.
    pub last_release: Option<NaiveDate>,
    /// Footer lines appended after the report.
    pub footer: Vec<String>,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            repositories: vec![
                RepositoryConfig {
                    repo: "godotengine/godot-proposals".to_string(),
                    heading: "Proposals".to_string(),
                    milestone_pattern: default_milestone_pattern(),
                },
                RepositoryConfig {
                    repo: "godotengine/godot".to_string(),
                    heading: "Issues".to_string(),
                    milestone_pattern: default_milestone_pattern(),
                },
            ],
            lookback_hours: 24,
            max_pages: 3,
            per_page: 100,
            max_message_chars: 2000,
            concurrency: 4,
            run_timeout_seconds: 600,
            badge: ":gdcute:".to_string(),
            waiting_line: "Waiting for **Godot 4.x dev/beta/rc/stable**".to_string(),
            last_release: NaiveDate::from_ymd_opt(2025, 9, 15),
            footer: vec![
                "For daily merged pull requests, visit [Github Pulse](<https://github.com/godotengine/godot/pulse/daily>).".to_string(),
                "Based on [source code by Qubrick](<https://github.com/Qubrick/WaitingReport>).".to_string(),
                String::new(),
                "Sincerely, the Godot Bot.".to_string(),
            ],
        }
    }
}

/// Scheduler settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Cron expression (with seconds field), evaluated in UTC.
    pub cron: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            cron: "0 0 0 * * *".to_string(),
        }
    }
}

/// Webhook delivery settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Discord-compatible webhook URL. Delivery is disabled when unset.
    pub webhook_url: Option<String>,
    /// Channel name used for cooldown bookkeeping and logs.
    pub channel: String,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            channel: "default".to_string(),
            timeout_seconds: 10,
        }
    }
}

/// Command cooldown settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Minimum seconds between two runs of the same command in one channel.
    pub cooldown_seconds: u64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            cooldown_seconds: 10,
        }
    }
}

/// Returns the Pulse configuration directory.
///
/// Respects the `XDG_CONFIG_HOME` environment variable if set,
/// otherwise defaults to `~/.config/pulse`.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config.is_empty()
    {
        return PathBuf::from(xdg_config).join("pulse");
    }
    dirs::home_dir()
        .expect("Could not determine home directory - is HOME set?")
        .join(".config")
        .join("pulse")
}

/// Returns the Pulse data directory.
///
/// Respects the `XDG_DATA_HOME` environment variable if set,
/// otherwise defaults to `~/.local/share/pulse`.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Ok(xdg_data) = std::env::var("XDG_DATA_HOME")
        && !xdg_data.is_empty()
    {
        return PathBuf::from(xdg_data).join("pulse");
    }
    dirs::home_dir()
        .expect("Could not determine home directory - is HOME set?")
        .join(".local")
        .join("share")
        .join("pulse")
}

/// Returns the path to the configuration file.
#[must_use]
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Load application configuration.
///
/// Loads from config file (if exists) and environment variables.
/// Environment variables use the prefix `PULSE_` and double underscore
/// for nested keys (e.g., `PULSE_GITHUB__API_TIMEOUT_SECONDS`).
///
/// # Errors
///
/// Returns `PulseError::Config` if the config file exists but is invalid.
pub fn load_config() -> Result<AppConfig, PulseError> {
    let config_path = config_file_path();

    let config = Config::builder()
        // Load from config file (optional - may not exist)
        .add_source(File::with_name(config_path.to_string_lossy().as_ref()).required(false))
        // Override with environment variables
        .add_source(
            Environment::with_prefix("PULSE")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn parse(config_str: &str) -> AppConfig {
        Config::builder()
            .add_source(config::File::from_str(config_str, config::FileFormat::Toml))
            .build()
            .expect("should build config")
            .try_deserialize()
            .expect("should deserialize")
    }

    #[test]
    #[serial]
    fn test_load_config_defaults() {
        // Without any config file or env vars, should return defaults
        let config = load_config().expect("should load with defaults");

        assert_eq!(config.github.api_url, "https://api.github.com");
        assert_eq!(config.github.api_timeout_seconds, 10);
        assert_eq!(config.digest.lookback_hours, 24);
        assert_eq!(config.digest.max_pages, 3);
        assert_eq!(config.digest.per_page, 100);
        assert_eq!(config.digest.max_message_chars, 2000);
        assert_eq!(config.digest.repositories.len(), 2);
        assert_eq!(config.schedule.cron, "0 0 0 * * *");
        assert_eq!(config.gate.cooldown_seconds, 10);
    }

    #[test]
    fn test_default_repositories_order() {
        let digest = DigestConfig::default();
        assert_eq!(digest.repositories[0].repo, "godotengine/godot-proposals");
        assert_eq!(digest.repositories[0].heading, "Proposals");
        assert_eq!(digest.repositories[1].repo, "godotengine/godot");
        assert_eq!(digest.repositories[1].heading, "Issues");
    }

    #[test]
    fn test_config_with_custom_repositories() {
        let config = parse(
            r#"
[digest]
lookback_hours = 48

[[digest.repositories]]
repo = "octocat/hello"
heading = "Hello"
milestone_pattern = "^v2"

[[digest.repositories]]
repo = "octocat/world"
heading = "World"
"#,
        );

        assert_eq!(config.digest.lookback_hours, 48);
        assert_eq!(config.digest.repositories.len(), 2);
        assert_eq!(config.digest.repositories[0].milestone_pattern, "^v2");
        // Missing pattern falls back to the default
        assert_eq!(config.digest.repositories[1].milestone_pattern, r"^4\.");
        // Untouched keys keep their defaults
        assert_eq!(config.digest.max_message_chars, 2000);
    }

    #[test]
    fn test_config_with_delivery_section() {
        let config = parse(
            r#"
[delivery]
webhook_url = "https://discord.example/api/webhooks/1/abc"
channel = "waiting-room"

[gate]
cooldown_seconds = 30
"#,
        );

        assert_eq!(
            config.delivery.webhook_url.as_deref(),
            Some("https://discord.example/api/webhooks/1/abc")
        );
        assert_eq!(config.delivery.channel, "waiting-room");
        assert_eq!(config.gate.cooldown_seconds, 30);
    }

    #[test]
    fn test_config_last_release_date() {
        let config = parse(
            r#"
[digest]
last_release = "2026-03-01"
"#,
        );
        assert_eq!(config.digest.last_release, NaiveDate::from_ymd_opt(2026, 3, 1));
    }

    #[test]
    fn test_config_file_path() {
        let path = config_file_path();
        assert!(path.ends_with("config.toml"));
    }

    #[test]
    #[serial]
    fn test_config_dir_respects_xdg_config_home() {
        let original = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe {
            std::env::set_var("XDG_CONFIG_HOME", "/custom/config");
        }

        let dir = config_dir();
        assert_eq!(dir, PathBuf::from("/custom/config/pulse"));

        // Cleanup
        unsafe {
            match original {
                Some(val) => std::env::set_var("XDG_CONFIG_HOME", val),
                None => std::env::remove_var("XDG_CONFIG_HOME"),
            }
        }
    }

    #[test]
    #[serial]
    fn test_data_dir_ignores_empty_xdg_data_home() {
        let original = std::env::var("XDG_DATA_HOME").ok();
        unsafe {
            std::env::set_var("XDG_DATA_HOME", "");
        }

        let dir = data_dir();
        assert!(dir.ends_with("pulse"));

        // Cleanup
        unsafe {
            match original {
                Some(val) => std::env::set_var("XDG_DATA_HOME", val),
                None => std::env::remove_var("XDG_DATA_HOME"),
            }
        }
    }
}
