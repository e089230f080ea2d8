// SPDX-License-Identifier: Apache-2.0

//! Post command - produce the digest and deliver it to the webhook.
//!
//! Guarded by a per-channel cooldown whose state lives in the data
//! directory, so back-to-back invocations see each other.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use pulse_core::gate::{CooldownGate, load_state, save_state};
use pulse_core::{AppConfig, DigestConfig, GitHubApi, WebhookClient, produce_digest_with_timeout};
use tracing::{info, instrument};

use super::types::PostResult;

/// Cooldown key for this command.
pub const COMMAND: &str = "post";

/// Inputs of one post invocation.
pub struct PostRequest<'a> {
    /// Digest settings (with overrides applied).
    pub settings: &'a DigestConfig,
    /// Channel the cooldown applies to.
    pub channel: &'a str,
    /// Skip delivery and cooldown bookkeeping.
    pub dry_run: bool,
    /// Where the cooldown state is kept.
    pub gate_path: &'a Path,
}

fn load_gate(config: &AppConfig, gate_path: &Path) -> Result<CooldownGate> {
    let state = load_state(gate_path)?;
    Ok(CooldownGate::with_state(config.gate.cooldown_seconds, state))
}

/// Fails with `PulseError::RateLimited` if `channel` is still cooling down.
pub fn check_cooldown(
    config: &AppConfig,
    gate_path: &Path,
    channel: &str,
    now: DateTime<Utc>,
) -> Result<()> {
    load_gate(config, gate_path)?.check(COMMAND, channel, now)?;
    Ok(())
}

/// Produces the digest and posts it.
///
/// The cooldown is re-checked and recorded only after every chunk was
/// delivered; a dry run neither posts nor records.
#[instrument(skip_all, fields(channel = request.channel, dry_run = request.dry_run))]
pub async fn run(
    api: &dyn GitHubApi,
    config: &AppConfig,
    request: PostRequest<'_>,
) -> Result<PostResult> {
    let mut gate = load_gate(config, request.gate_path)?;
    gate.check(COMMAND, request.channel, Utc::now())?;

    let digest = produce_digest_with_timeout(api, request.settings, Utc::now()).await?;

    if request.dry_run {
        info!(chunks = digest.chunks.len(), "Dry run, not posting");
        return Ok(PostResult {
            channel: request.channel.to_string(),
            dry_run: true,
            posted: 0,
            chunks: digest.chunks,
        });
    }

    let client = WebhookClient::from_config(&config.delivery)?;
    client.deliver_chunks(&digest.chunks).await?;

    gate.record(COMMAND, request.channel, Utc::now());
    save_state(request.gate_path, gate.state()).context("Failed to save cooldown state")?;

    Ok(PostResult {
        channel: request.channel.to_string(),
        dry_run: false,
        posted: digest.chunks.len(),
        chunks: digest.chunks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_core::PulseError;
    use pulse_core::gate::GateState;

    #[test]
    fn test_check_cooldown_reads_saved_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gate.json");
        let config = AppConfig::default();
        let now = Utc::now();

        assert!(check_cooldown(&config, &path, "general", now).is_ok());

        let mut gate = CooldownGate::with_state(10, GateState::default());
        gate.record(COMMAND, "general", now);
        save_state(&path, gate.state()).unwrap();

        let err = check_cooldown(&config, &path, "general", now).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PulseError>(),
            Some(PulseError::RateLimited { .. })
        ));
        assert!(check_cooldown(&config, &path, "other", now).is_ok());
    }
}
