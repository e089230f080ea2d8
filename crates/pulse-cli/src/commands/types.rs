// SPDX-License-Identifier: Apache-2.0

//! Result types returned by command handlers.
//!
//! These types allow command handlers to return data instead of printing
//! directly, improving testability and separation of concerns.

use chrono::{DateTime, Utc};
use pulse_core::{Digest, DigestReport, LookbackWindow, RequestStats};
use serde::Serialize;

/// Result from the digest command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DigestResult {
    /// Run identifier.
    pub run_id: String,
    /// Window the digest covers.
    pub window: LookbackWindow,
    /// Message-sized chunks, in posting order.
    pub chunks: Vec<String>,
    /// Remote call totals.
    pub stats: RequestStats,
    /// Structured report.
    pub report: DigestReport,
}

impl From<Digest> for DigestResult {
    fn from(digest: Digest) -> Self {
        Self {
            run_id: digest.run_id.to_string(),
            window: digest.window,
            chunks: digest.chunks,
            stats: digest.stats,
            report: digest.report,
        }
    }
}

/// Result from the post command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PostResult {
    /// Channel the digest was posted to.
    pub channel: String,
    /// Whether posting was skipped.
    pub dry_run: bool,
    /// Number of chunks posted.
    pub posted: usize,
    /// Chunks that were (or would have been) posted.
    pub chunks: Vec<String>,
}

/// One row of the milestones command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MilestoneRow {
    /// Repository in `owner/name` format.
    pub repo: String,
    /// Section heading of the repository.
    pub heading: String,
    /// Milestone title.
    pub title: String,
    /// Open issue count.
    pub open_issues: u64,
    /// Closed issue count.
    pub closed_issues: u64,
    /// Closed share, in percent.
    pub completion_percent: u64,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Result from the milestones command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MilestonesResult {
    /// Active milestones, repositories in configured order.
    pub milestones: Vec<MilestoneRow>,
}
