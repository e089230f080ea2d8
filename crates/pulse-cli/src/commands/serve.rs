// SPDX-License-Identifier: Apache-2.0

//! Serve command - post a digest at every cron occurrence.

use anyhow::Result;
use chrono::{DateTime, Utc};
use pulse_core::{AppConfig, DigestConfig, GitHubApi, WebhookClient, produce_digest_with_timeout};
use tracing::{info, instrument};

use crate::schedule::{RunSchedule, run_forever};

/// Runs the scheduler until Ctrl-C.
pub async fn run(api: &dyn GitHubApi, config: &AppConfig) -> Result<()> {
    let schedule = RunSchedule::parse(&config.schedule.cron)?;
    let client = WebhookClient::from_config(&config.delivery)?;

    info!(
        cron = %config.schedule.cron,
        channel = %config.delivery.channel,
        "Scheduler started"
    );

    let settings = &config.digest;
    let client = &client;
    run_forever(&schedule, move |occurrence| {
        run_once(api, settings, client, occurrence)
    })
    .await
}

/// One scheduled run. Nothing is posted when the digest fails or times out.
#[instrument(skip(api, settings, client))]
async fn run_once(
    api: &dyn GitHubApi,
    settings: &DigestConfig,
    client: &WebhookClient,
    occurrence: DateTime<Utc>,
) -> Result<()> {
    let digest = produce_digest_with_timeout(api, settings, Utc::now()).await?;
    client.deliver_chunks(&digest.chunks).await?;
    info!(run_id = %digest.run_id, chunks = digest.chunks.len(), "Scheduled digest posted");
    Ok(())
}
