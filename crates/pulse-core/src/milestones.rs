// SPDX-License-Identifier: Apache-2.0

//! Milestone resolution: which open milestones a run reports on.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::config::RepositoryConfig;
use crate::fetch::FetchStats;
use crate::github::GitHubApi;
use crate::github::types::MilestoneRecord;
use crate::window::LookbackWindow;

/// An active milestone of a watched repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Milestone {
    /// Title, used verbatim in search queries.
    pub title: String,
    /// Open issue count.
    pub open_issues: u64,
    /// Closed issue count.
    pub closed_issues: u64,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

impl Milestone {
    /// Percentage of closed issues, rounded down. Zero for an empty milestone.
    #[must_use]
    pub fn completion_percent(&self) -> u64 {
        let total = self.open_issues + self.closed_issues;
        if total == 0 {
            return 0;
        }
        // floor(100 - open * 100 / total) == 100 - ceil(open * 100 / total)
        100 - (self.open_issues * 100).div_ceil(total)
    }
}

impl From<MilestoneRecord> for Milestone {
    fn from(record: MilestoneRecord) -> Self {
        Self {
            title: record.title,
            open_issues: record.open_issues,
            closed_issues: record.closed_issues,
            updated_at: record.updated_at,
        }
    }
}

/// Keeps milestones whose title matches `pattern` and that were updated
/// strictly after the window start, in API order.
#[must_use]
pub fn select_active(
    records: Vec<MilestoneRecord>,
    pattern: &Regex,
    window: &LookbackWindow,
) -> Vec<Milestone> {
    records
        .into_iter()
        .filter(|m| pattern.is_match(&m.title) && window.is_newer(m.updated_at))
        .map(Milestone::from)
        .collect()
}

/// Lists the active milestones of one repository.
///
/// A failed listing is logged and yields no milestones; the rest of the run
/// continues without this repository.
#[instrument(skip_all, fields(repo = %repository.repo))]
pub async fn resolve_milestones(
    api: &dyn GitHubApi,
    repository: &RepositoryConfig,
    pattern: &Regex,
    window: &LookbackWindow,
    stats: &FetchStats,
) -> Vec<Milestone> {
    stats.record_attempt();
    let records = match api.list_milestones(&repository.repo).await {
        Ok(records) => records,
        Err(e) => {
            stats.record_failure();
            warn!(error = %format!("{e:#}"), "Failed to list milestones");
            return Vec::new();
        }
    };

    let milestones = select_active(records, pattern, window);
    for milestone in &milestones {
        info!(
            heading = %repository.heading,
            milestone = %milestone.title,
            open = milestone.open_issues,
            closed = milestone.closed_issues,
            complete = milestone.completion_percent(),
            "Active milestone"
        );
    }
    milestones
}
