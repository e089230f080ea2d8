// SPDX-License-Identifier: Apache-2.0

//! The report tree and its text rendering.
//!
//! Shape: repository section → milestone → outcome group → entity kind →
//! category → items. Every level keeps insertion order, so rendering follows
//! fetch order rather than completion order.

use std::fmt::Write as _;

use serde::Serialize;

use crate::activity::{ActivityItem, EntityKind};
use crate::classify::{classify, display_name};
use crate::fetch::OutcomeGroup;
use crate::milestones::Milestone;

/// Items of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryGroup {
    /// Category key derived from labels (empty for unlabelled items).
    pub key: String,
    /// Rendered category name.
    pub display_name: String,
    /// Items in fetch order.
    pub items: Vec<ActivityItem>,
}

/// Items of one entity kind, grouped by category in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KindReport {
    /// Categories in first-seen order.
    pub categories: Vec<CategoryGroup>,
}

impl KindReport {
    /// Folds items into categories, preserving first-seen order.
    #[must_use]
    pub fn from_items(items: Vec<ActivityItem>) -> Self {
        let mut report = Self::default();
        for item in items {
            report.push(item);
        }
        report
    }

    /// Adds one item to its category.
    pub fn push(&mut self, item: ActivityItem) {
        let key = classify(&item.labels);
        match self.categories.iter_mut().find(|c| c.key == key) {
            Some(group) => group.items.push(item),
            None => self.categories.push(CategoryGroup {
                display_name: display_name(&key),
                key,
                items: vec![item],
            }),
        }
    }

    /// True when no item was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.iter().all(|c| c.items.is_empty())
    }

    /// Total number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }
}

/// Pull requests and issues of one outcome group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupReport {
    /// Pull requests.
    pub pull_requests: KindReport,
    /// Issues.
    pub issues: KindReport,
}

impl GroupReport {
    /// The report for `kind`.
    pub fn kind_mut(&mut self, kind: EntityKind) -> &mut KindReport {
        match kind {
            EntityKind::PullRequest => &mut self.pull_requests,
            EntityKind::Issue => &mut self.issues,
        }
    }

    /// Both kinds in render order.
    #[must_use]
    pub fn kinds(&self) -> [(EntityKind, &KindReport); 2] {
        [
            (EntityKind::PullRequest, &self.pull_requests),
            (EntityKind::Issue, &self.issues),
        ]
    }

    /// True when neither kind has items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pull_requests.is_empty() && self.issues.is_empty()
    }
}

/// Everything reported for one milestone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MilestoneReport {
    /// Milestone title.
    pub title: String,
    /// Closed share of the milestone's issues, in percent.
    pub completion_percent: u64,
    /// Items reopened in the window.
    pub reopened: GroupReport,
    /// Items closed in the window.
    pub closed: GroupReport,
}

impl MilestoneReport {
    /// An empty report for `milestone`.
    #[must_use]
    pub fn new(milestone: &Milestone) -> Self {
        Self {
            title: milestone.title.clone(),
            completion_percent: milestone.completion_percent(),
            reopened: GroupReport::default(),
            closed: GroupReport::default(),
        }
    }

    /// The report for `group`.
    pub fn group_mut(&mut self, group: OutcomeGroup) -> &mut GroupReport {
        match group {
            OutcomeGroup::Reopened => &mut self.reopened,
            OutcomeGroup::Closed => &mut self.closed,
        }
    }

    /// Both groups in render order.
    #[must_use]
    pub fn groups(&self) -> [(OutcomeGroup, &GroupReport); 2] {
        [
            (OutcomeGroup::Reopened, &self.reopened),
            (OutcomeGroup::Closed, &self.closed),
        ]
    }

    /// True when no leaf list has items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reopened.is_empty() && self.closed.is_empty()
    }

    fn render_into(&self, out: &mut String) {
        for (group, report) in self.groups() {
            for (kind, items) in report.kinds() {
                if items.is_empty() {
                    continue;
                }
                let _ = writeln!(
                    out,
                    "## {} {} {}",
                    self.title,
                    group.label(),
                    kind.section_label()
                );
                for category in &items.categories {
                    let _ = writeln!(out, "### {}", category.display_name);
                    for item in &category.items {
                        out.push_str(&item.line());
                        out.push('\n');
                    }
                }
            }
        }
    }
}

/// All milestones of one watched repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoSection {
    /// Repository in `owner/name` format.
    pub repo: String,
    /// Heading rendered above the section.
    pub heading: String,
    /// Milestones with at least one item, in resolver order.
    pub milestones: Vec<MilestoneReport>,
}

impl RepoSection {
    /// An empty section.
    #[must_use]
    pub fn new(repo: impl Into<String>, heading: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            heading: heading.into(),
            milestones: Vec::new(),
        }
    }

    /// Adds a milestone report, dropping it when it has no items.
    pub fn push(&mut self, milestone: MilestoneReport) {
        if !milestone.is_empty() {
            self.milestones.push(milestone);
        }
    }

    /// Renders the section, or an empty string when it has no content.
    #[must_use]
    pub fn render(&self) -> String {
        let mut body = String::new();
        for milestone in &self.milestones {
            milestone.render_into(&mut body);
        }
        if body.is_empty() {
            return body;
        }
        format!("# {}\n{body}", self.heading)
    }
}

/// The report of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DigestReport {
    /// Sections in configured repository order.
    pub sections: Vec<RepoSection>,
}

impl DigestReport {
    /// Renders every section with content, in order.
    #[must_use]
    pub fn render(&self) -> String {
        self.sections.iter().map(RepoSection::render).collect()
    }

    /// Total number of reported items.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| &s.milestones)
            .flat_map(|m| [&m.reopened, &m.closed])
            .map(|g| g.pull_requests.len() + g.issues.len())
            .sum()
    }
}
