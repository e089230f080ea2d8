// SPDX-License-Identifier: Apache-2.0

//! Per-command, per-channel cooldown.
//!
//! The gate remembers when a command last completed in a channel and refuses
//! a new invocation there until the cooldown has elapsed. State can be kept
//! in `~/.local/share/pulse/gate.json` so one-shot invocations share it.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::data_dir;
use crate::error::PulseError;

/// Last successful use of each command, keyed by command then channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateState {
    /// `command -> channel -> last use`.
    #[serde(default)]
    pub last_used: HashMap<String, HashMap<String, DateTime<Utc>>>,
}

/// Cooldown gate over a [`GateState`].
#[derive(Debug, Clone)]
pub struct CooldownGate {
    cooldown: Duration,
    state: GateState,
}

impl CooldownGate {
    /// A gate with no recorded invocations.
    #[must_use]
    pub fn new(cooldown_seconds: u64) -> Self {
        Self::with_state(cooldown_seconds, GateState::default())
    }

    /// A gate resuming from saved state.
    #[must_use]
    pub fn with_state(cooldown_seconds: u64, state: GateState) -> Self {
        let seconds = i64::try_from(cooldown_seconds).unwrap_or(i64::MAX);
        Self {
            cooldown: Duration::try_seconds(seconds).unwrap_or(Duration::MAX),
            state,
        }
    }

    /// Current state, for persisting.
    #[must_use]
    pub fn state(&self) -> &GateState {
        &self.state
    }

    /// Checks whether `command` may run in `channel` at `now`.
    ///
    /// # Errors
    ///
    /// Returns `PulseError::RateLimited` with the remaining wait, rounded up
    /// to whole seconds.
    pub fn check(&self, command: &str, channel: &str, now: DateTime<Utc>) -> crate::Result<()> {
        let Some(last) = self
            .state
            .last_used
            .get(command)
            .and_then(|channels| channels.get(channel))
        else {
            return Ok(());
        };

        let elapsed = now.signed_duration_since(*last);
        if elapsed >= self.cooldown {
            return Ok(());
        }

        let remaining = self.cooldown - elapsed;
        let mut retry_after = remaining.num_seconds();
        if remaining > Duration::seconds(retry_after) {
            retry_after += 1;
        }
        Err(PulseError::RateLimited {
            command: command.to_string(),
            channel: channel.to_string(),
            retry_after: u64::try_from(retry_after).unwrap_or(0),
        })
    }

    /// Records a successful invocation.
    pub fn record(&mut self, command: &str, channel: &str, now: DateTime<Utc>) {
        self.state
            .last_used
            .entry(command.to_string())
            .or_default()
            .insert(channel.to_string(), now);
    }
}

/// Returns the path of the persisted gate state.
#[must_use]
pub fn gate_file_path() -> PathBuf {
    data_dir().join("gate.json")
}

/// Loads gate state from `path`, or empty state if the file does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_state(path: &Path) -> Result<GateState> {
    if !path.exists() {
        return Ok(GateState::default());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read gate state from {}", path.display()))?;
    let state = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse gate state from {}", path.display()))?;
    Ok(state)
}

/// Saves gate state to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn save_state(path: &Path, state: &GateState) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let contents = serde_json::to_string_pretty(state).context("Failed to serialize gate state")?;
    fs::write(path, contents)
        .with_context(|| format!("Failed to write gate state to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_first_use_is_allowed() {
        let gate = CooldownGate::new(10);
        assert!(gate.check("post", "general", t0()).is_ok());
    }

    #[test]
    fn test_repeat_within_cooldown_is_rejected() {
        let mut gate = CooldownGate::new(10);
        gate.record("post", "general", t0());

        let err = gate
            .check("post", "general", t0() + Duration::milliseconds(3500))
            .unwrap_err();
        match err {
            PulseError::RateLimited {
                command,
                channel,
                retry_after,
            } => {
                assert_eq!(command, "post");
                assert_eq!(channel, "general");
                assert_eq!(retry_after, 7);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_allowed_after_cooldown() {
        let mut gate = CooldownGate::new(10);
        gate.record("post", "general", t0());
        assert!(gate.check("post", "general", t0() + Duration::seconds(10)).is_ok());
    }

    #[test]
    fn test_cooldown_is_per_channel_and_command() {
        let mut gate = CooldownGate::new(10);
        gate.record("post", "general", t0());
        assert!(gate.check("post", "releases", t0()).is_ok());
        assert!(gate.check("digest", "general", t0()).is_ok());
    }

    #[test]
    fn test_state_persists_across_gates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("gate.json");

        let mut gate = CooldownGate::new(10);
        gate.record("post", "general", t0());
        save_state(&path, gate.state()).unwrap();

        let restored = CooldownGate::with_state(10, load_state(&path).unwrap());
        assert!(restored.check("post", "general", t0()).is_err());
    }

    #[test]
    fn test_missing_state_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let state = load_state(&dir.path().join("absent.json")).unwrap();
        assert_eq!(state, GateState::default());
    }
}
