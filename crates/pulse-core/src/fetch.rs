// SPDX-License-Identifier: Apache-2.0

//! Paginated issue search for one query group.
//!
//! A query group is one (milestone, outcome group, entity kind) search. Each
//! group keeps its own dedup set; failures degrade the group to whatever was
//! collected before the failing call.

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use bon::Builder;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::activity::{ActivityItem, EntityKind};
use crate::github::GitHubApi;
use crate::window::LookbackWindow;

/// Issue state search qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueState {
    /// `state:open`
    Open,
    /// `state:closed`
    Closed,
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueState::Open => write!(f, "open"),
            IssueState::Closed => write!(f, "closed"),
        }
    }
}

/// Timestamp the window bound applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    /// `created:>=`
    Created,
    /// `updated:>=`
    Updated,
    /// `closed:>=`
    Closed,
}

impl fmt::Display for TimeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeField::Created => write!(f, "created"),
            TimeField::Updated => write!(f, "updated"),
            TimeField::Closed => write!(f, "closed"),
        }
    }
}

/// The two outcome groups reported per milestone, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeGroup {
    /// Items reopened inside the window.
    Reopened,
    /// Items closed inside the window.
    Closed,
}

impl OutcomeGroup {
    /// Both groups, reopened first.
    pub const ALL: [OutcomeGroup; 2] = [OutcomeGroup::Reopened, OutcomeGroup::Closed];

    /// Word used in section headings.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            OutcomeGroup::Reopened => "reopened",
            OutcomeGroup::Closed => "closed",
        }
    }

    /// Builds the search for this group.
    ///
    /// Reopened items are open, updated in the window, carry the `reopened`
    /// reason, and must have a `reopened` event in the window. Closed items
    /// are closed in the window.
    #[must_use]
    pub fn query(
        self,
        repo: &str,
        milestone: &str,
        kind: EntityKind,
        window: LookbackWindow,
    ) -> IssueQuery {
        let builder = IssueQuery::builder()
            .repo(repo)
            .milestone(milestone)
            .kind(kind)
            .window(window);
        match self {
            OutcomeGroup::Reopened => builder
                .state(IssueState::Open)
                .time_field(TimeField::Updated)
                .state_reason("reopened")
                .required_event("reopened")
                .build(),
            OutcomeGroup::Closed => builder
                .state(IssueState::Closed)
                .time_field(TimeField::Closed)
                .build(),
        }
    }
}

/// Parameters of one paginated search.
#[derive(Debug, Clone, Builder)]
pub struct IssueQuery {
    /// Repository in `owner/name` format.
    #[builder(into)]
    pub repo: String,
    /// Milestone title.
    #[builder(into)]
    pub milestone: String,
    /// Issues or pull requests.
    pub kind: EntityKind,
    /// Open or closed.
    pub state: IssueState,
    /// Exact close/reopen reason an item must carry.
    #[builder(into)]
    pub state_reason: Option<String>,
    /// Event that must have happened inside the window.
    #[builder(into)]
    pub required_event: Option<String>,
    /// Timestamp the window bound applies to.
    pub time_field: TimeField,
    /// Look-back window.
    pub window: LookbackWindow,
    /// Page cap.
    #[builder(default = 3)]
    pub max_pages: u32,
    /// Results per page.
    #[builder(default = 100)]
    pub per_page: u8,
}

impl IssueQuery {
    /// The `q` parameter sent to the search endpoint.
    #[must_use]
    pub fn query_string(&self) -> String {
        format!(
            "repo:{} is:{} milestone:\"{}\" state:{} {}:>={}",
            self.repo,
            self.kind.search_qualifier(),
            self.milestone,
            self.state,
            self.time_field,
            self.window.start_iso()
        )
    }
}

/// Remote call counters for one run. Shared by every concurrent group.
#[derive(Debug, Default)]
pub struct FetchStats {
    attempted: AtomicUsize,
    failed: AtomicUsize,
}

impl FetchStats {
    /// Counts a remote call about to be made.
    pub fn record_attempt(&self) {
        self.attempted.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a remote call that failed.
    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of the counters.
    #[must_use]
    pub fn snapshot(&self) -> RequestStats {
        RequestStats {
            attempted: self.attempted.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Remote call totals of a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RequestStats {
    /// Calls made.
    pub attempted: usize,
    /// Calls that failed or timed out.
    pub failed: usize,
}

impl RequestStats {
    /// True when calls were made and none of them succeeded.
    #[must_use]
    pub fn all_failed(&self) -> bool {
        self.attempted > 0 && self.failed == self.attempted
    }
}

/// Runs one query group and returns its accepted items in fetch order.
///
/// Never fails: a failed page stops pagination and a failed event lookup
/// rejects only that item. Both are counted in `stats`.
#[instrument(
    skip_all,
    fields(repo = %query.repo, milestone = %query.milestone, kind = ?query.kind, state = %query.state)
)]
pub async fn fetch_activity(
    api: &dyn GitHubApi,
    query: &IssueQuery,
    stats: &FetchStats,
) -> Vec<ActivityItem> {
    let q = query.query_string();
    let mut seen: HashSet<u64> = HashSet::new();
    let mut items = Vec::new();

    for page in 1..=query.max_pages {
        stats.record_attempt();
        let result = match api.search_issues(&q, page, query.per_page).await {
            Ok(result) => result,
            Err(e) => {
                stats.record_failure();
                warn!(page, error = %format!("{e:#}"), "Search page failed, keeping collected items");
                break;
            }
        };

        if result.total_count == 0 || result.items.is_empty() {
            debug!(page, "No more results");
            break;
        }

        for hit in &result.items {
            if let Some(reason) = query.state_reason.as_deref()
                && hit.state_reason.as_deref() != Some(reason)
            {
                continue;
            }
            if seen.contains(&hit.number) {
                debug!(number = hit.number, "Skipping duplicate");
                continue;
            }
            if let Some(event) = query.required_event.as_deref()
                && !event_in_window(api, query, hit.number, event, stats).await
            {
                continue;
            }
            let Some(item) = ActivityItem::from_search(hit, query.kind) else {
                debug!(number = hit.number, "Unreported state, dropping");
                continue;
            };
            seen.insert(hit.number);
            items.push(item);
        }
    }

    debug!(count = items.len(), "Query group fetched");
    items
}

async fn event_in_window(
    api: &dyn GitHubApi,
    query: &IssueQuery,
    number: u64,
    event: &str,
    stats: &FetchStats,
) -> bool {
    stats.record_attempt();
    match api.issue_events(&query.repo, number).await {
        Ok(events) => events
            .iter()
            .any(|e| e.event == event && query.window.includes(e.created_at)),
        Err(e) => {
            stats.record_failure();
            warn!(number, error = %format!("{e:#}"), "Event lookup failed, rejecting item");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn window() -> LookbackWindow {
        LookbackWindow::trailing_hours(Utc.with_ymd_and_hms(2026, 10, 15, 0, 0, 0).unwrap(), 24)
    }

    #[test]
    fn test_closed_query_string() {
        let query = OutcomeGroup::Closed.query(
            "godotengine/godot",
            "4.6",
            EntityKind::PullRequest,
            window(),
        );
        assert_eq!(
            query.query_string(),
            "repo:godotengine/godot is:pr milestone:\"4.6\" state:closed closed:>=2026-10-14T00:00:00Z"
        );
        assert!(query.state_reason.is_none());
        assert!(query.required_event.is_none());
    }

    #[test]
    fn test_reopened_query_requires_event() {
        let query = OutcomeGroup::Reopened.query(
            "godotengine/godot-proposals",
            "4.x",
            EntityKind::Issue,
            window(),
        );
        assert_eq!(
            query.query_string(),
            "repo:godotengine/godot-proposals is:issue milestone:\"4.x\" state:open updated:>=2026-10-14T00:00:00Z"
        );
        assert_eq!(query.state_reason.as_deref(), Some("reopened"));
        assert_eq!(query.required_event.as_deref(), Some("reopened"));
        assert_eq!(query.max_pages, 3);
        assert_eq!(query.per_page, 100);
    }

    #[test]
    fn test_custom_query_on_created_time() {
        let query = IssueQuery::builder()
            .repo("godotengine/godot-docs")
            .milestone("4.6 docs")
            .kind(EntityKind::Issue)
            .state(IssueState::Open)
            .time_field(TimeField::Created)
            .window(window())
            .max_pages(1)
            .build();
        assert_eq!(
            query.query_string(),
            "repo:godotengine/godot-docs is:issue milestone:\"4.6 docs\" state:open created:>=2026-10-14T00:00:00Z"
        );
        assert_eq!(query.max_pages, 1);
        assert!(query.state_reason.is_none());
    }

    #[test]
    fn test_request_stats_all_failed() {
        let stats = FetchStats::default();
        assert!(!stats.snapshot().all_failed());

        stats.record_attempt();
        stats.record_failure();
        assert!(stats.snapshot().all_failed());

        stats.record_attempt();
        assert!(!stats.snapshot().all_failed());
        assert_eq!(
            stats.snapshot(),
            RequestStats {
                attempted: 2,
                failed: 1
            }
        );
    }
}
