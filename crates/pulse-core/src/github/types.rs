// SPDX-License-Identifier: Apache-2.0

//! Wire types for the GitHub REST endpoints the digest reads.
//!
//! Only the fields the digest uses are modelled; everything else in the
//! payloads is ignored by serde.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entry of `GET /repos/{repo}/milestones`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MilestoneRecord {
    /// Milestone title, also used as the search qualifier.
    pub title: String,
    /// Number of open issues in the milestone.
    pub open_issues: u64,
    /// Number of closed issues in the milestone.
    pub closed_issues: u64,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Response of `GET /search/issues`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchPage {
    /// Total matches across all pages.
    pub total_count: u64,
    /// Items on this page.
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

/// A label attached to an issue or pull request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabelRef {
    /// Label name.
    pub name: String,
}

/// Pull request marker present on search items that are PRs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PullRequestRef {
    /// Merge time, absent for unmerged PRs.
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
}

/// One issue or pull request returned by the search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchItem {
    /// Issue/PR number, unique within the repository.
    pub number: u64,
    /// Canonical web URL.
    pub html_url: String,
    /// Title.
    pub title: String,
    /// Close or reopen reason (`completed`, `not_planned`, `reopened`, `duplicate`).
    #[serde(default)]
    pub state_reason: Option<String>,
    /// Present only for pull requests.
    #[serde(default)]
    pub pull_request: Option<PullRequestRef>,
    /// Labels in the order GitHub returns them.
    #[serde(default)]
    pub labels: Vec<LabelRef>,
}

/// Entry of `GET /repos/{repo}/issues/{number}/events`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssueEvent {
    /// Event name (`reopened`, `closed`, `labeled`, ...).
    pub event: String,
    /// When the event happened.
    pub created_at: DateTime<Utc>,
}
