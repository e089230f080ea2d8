// SPDX-License-Identifier: Apache-2.0

//! Activity items: issues and pull requests that changed state in the window.

use serde::Serialize;

use crate::github::types::SearchItem;

/// Whether an item is an issue or a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A plain issue.
    Issue,
    /// A pull request.
    PullRequest,
}

impl EntityKind {
    /// Value of the `is:` search qualifier.
    #[must_use]
    pub fn search_qualifier(self) -> &'static str {
        match self {
            EntityKind::Issue => "issue",
            EntityKind::PullRequest => "pr",
        }
    }

    /// Label used in rendered section headings.
    #[must_use]
    pub fn section_label(self) -> &'static str {
        match self {
            EntityKind::Issue => "issues",
            EntityKind::PullRequest => "PRs",
        }
    }
}

/// Derived lifecycle bucket of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Pull request merged.
    MergedPr,
    /// Pull request closed without merging.
    ClosedPr,
    /// Issue closed as completed.
    CompletedIssue,
    /// Issue closed as not planned.
    NotPlannedIssue,
    /// Issue reopened.
    ReopenedIssue,
    /// Issue closed as duplicate.
    DuplicateIssue,
}

impl Outcome {
    /// Derives the outcome from a search item.
    ///
    /// Pull requests without a state reason are merged or closed depending on
    /// `merged_at`. Anything with a reason (PRs included) is bucketed by that
    /// reason. Returns `None` for states the digest does not report.
    #[must_use]
    pub fn derive(item: &SearchItem) -> Option<Self> {
        match (&item.pull_request, item.state_reason.as_deref()) {
            (Some(pr), None) => Some(if pr.merged_at.is_some() {
                Outcome::MergedPr
            } else {
                Outcome::ClosedPr
            }),
            (_, Some("completed")) => Some(Outcome::CompletedIssue),
            (_, Some("not_planned")) => Some(Outcome::NotPlannedIssue),
            (_, Some("reopened")) => Some(Outcome::ReopenedIssue),
            (_, Some("duplicate")) => Some(Outcome::DuplicateIssue),
            _ => None,
        }
    }

    /// Glyph and tag prefixed to the item line.
    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            Outcome::MergedPr => ":purple_circle: [M][PR]",
            Outcome::ClosedPr => ":red_circle: [C][PR]",
            Outcome::CompletedIssue => ":purple_circle: [C]",
            Outcome::NotPlannedIssue => ":red_circle: [N]",
            Outcome::ReopenedIssue => ":green_circle: [R]",
            Outcome::DuplicateIssue => ":black_circle: [D]",
        }
    }
}

/// One issue or pull request selected for the digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityItem {
    /// Number, unique within the repository.
    pub number: u64,
    /// Display title.
    pub title: String,
    /// Canonical web URL.
    pub url: String,
    /// Issue or pull request.
    pub kind: EntityKind,
    /// Derived lifecycle outcome.
    pub outcome: Outcome,
    /// Label names in API order.
    pub labels: Vec<String>,
}

impl ActivityItem {
    /// Converts a search hit into an activity item.
    ///
    /// Returns `None` when the item's state is not reported.
    #[must_use]
    pub fn from_search(item: &SearchItem, kind: EntityKind) -> Option<Self> {
        let outcome = Outcome::derive(item)?;
        Some(Self {
            number: item.number,
            title: item.title.clone(),
            url: item.html_url.clone(),
            kind,
            outcome,
            labels: item.labels.iter().map(|l| l.name.clone()).collect(),
        })
    }

    /// Rendered report line.
    #[must_use]
    pub fn line(&self) -> String {
        format!(
            "{} [#{}](<{}>): {}",
            self.outcome.glyph(),
            self.number,
            self.url,
            self.title
        )
    }
}
