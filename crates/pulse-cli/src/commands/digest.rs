// SPDX-License-Identifier: Apache-2.0

//! Digest command - produce the digest and return it for printing.

use anyhow::Result;
use chrono::{DateTime, Utc};
use pulse_core::{DigestConfig, GitHubApi, produce_digest_with_timeout};
use tracing::instrument;

use super::types::DigestResult;

/// Produces the digest for the window ending at `now`.
#[instrument(skip_all)]
pub async fn run(
    api: &dyn GitHubApi,
    settings: &DigestConfig,
    now: DateTime<Utc>,
) -> Result<DigestResult> {
    let digest = produce_digest_with_timeout(api, settings, now).await?;
    Ok(digest.into())
}
