// SPDX-License-Identifier: Apache-2.0

//! Milestones command - list the milestones a digest would cover.

use anyhow::Result;
use chrono::{DateTime, Utc};
use pulse_core::digest::validate_settings;
use pulse_core::fetch::FetchStats;
use pulse_core::{DigestConfig, GitHubApi, LookbackWindow, PulseError, resolve_milestones};
use tracing::instrument;

use super::types::{MilestoneRow, MilestonesResult};

/// Resolves active milestones of every configured repository.
#[instrument(skip_all)]
pub async fn run(
    api: &dyn GitHubApi,
    settings: &DigestConfig,
    now: DateTime<Utc>,
) -> Result<MilestonesResult> {
    let patterns = validate_settings(settings)?;
    let window = LookbackWindow::trailing_hours(now, settings.lookback_hours);
    let stats = FetchStats::default();

    let mut rows = Vec::new();
    for (repository, pattern) in settings.repositories.iter().zip(&patterns) {
        let milestones = resolve_milestones(api, repository, pattern, &window, &stats).await;
        rows.extend(milestones.into_iter().map(|m| MilestoneRow {
            repo: repository.repo.clone(),
            heading: repository.heading.clone(),
            completion_percent: m.completion_percent(),
            title: m.title,
            open_issues: m.open_issues,
            closed_issues: m.closed_issues,
            updated_at: m.updated_at,
        }));
    }

    let stats = stats.snapshot();
    if stats.all_failed() {
        return Err(PulseError::AllRequestsFailed {
            attempted: stats.attempted,
        }
        .into());
    }

    Ok(MilestonesResult { milestones: rows })
}
