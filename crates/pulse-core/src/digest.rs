// SPDX-License-Identifier: Apache-2.0

//! Digest facade: one call from settings to ready-to-post chunks.
//!
//! ```rust,no_run
//! use pulse_core::{OctocrabApi, StaticTokenProvider, load_config, produce_digest};
//! use secrecy::SecretString;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = load_config()?;
//! let provider = StaticTokenProvider::new(SecretString::from("ghp_example".to_string()));
//! let api = OctocrabApi::from_config(&provider, &config.github)?;
//!
//! let digest = produce_digest(&api, &config.digest, chrono::Utc::now()).await?;
//! for chunk in &digest.chunks {
//!     println!("{chunk}");
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt::Write as _;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use regex::Regex;
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::activity::EntityKind;
use crate::chunk::split_into_chunks;
use crate::config::DigestConfig;
use crate::error::PulseError;
use crate::fetch::{FetchStats, IssueQuery, OutcomeGroup, RequestStats, fetch_activity};
use crate::github::{GitHubApi, parse_owner_repo};
use crate::milestones::resolve_milestones;
use crate::report::{DigestReport, MilestoneReport, RepoSection};
use crate::window::LookbackWindow;

/// Kinds fetched per outcome group, in render order.
const KINDS: [EntityKind; 2] = [EntityKind::PullRequest, EntityKind::Issue];

/// Result of one digest run.
#[derive(Debug, Clone, Serialize)]
pub struct Digest {
    /// Identifier of the run, for correlating logs.
    pub run_id: Uuid,
    /// Window the run reported on.
    pub window: LookbackWindow,
    /// Structured report.
    pub report: DigestReport,
    /// Full rendered text: header, sections, footer.
    pub text: String,
    /// `text` split into message-sized chunks.
    pub chunks: Vec<String>,
    /// Remote call totals.
    pub stats: RequestStats,
}

/// One query group and where its items land in the report.
struct Job {
    section: usize,
    milestone: usize,
    group: OutcomeGroup,
    query: IssueQuery,
}

/// Checks settings and compiles the milestone patterns, one per repository.
///
/// # Errors
///
/// Returns `PulseError::InvalidPattern` for a pattern that does not compile,
/// or `PulseError::Config` for any other invalid value.
pub fn validate_settings(settings: &DigestConfig) -> crate::Result<Vec<Regex>> {
    let invalid = |message: String| PulseError::Config { message };

    if settings.max_pages == 0 {
        return Err(invalid("digest.max_pages must be at least 1".to_string()));
    }
    if settings.per_page == 0 || settings.per_page > 100 {
        return Err(invalid("digest.per_page must be between 1 and 100".to_string()));
    }
    if settings.max_message_chars < 2 {
        return Err(invalid("digest.max_message_chars must be at least 2".to_string()));
    }
    if settings.concurrency == 0 {
        return Err(invalid("digest.concurrency must be at least 1".to_string()));
    }

    settings
        .repositories
        .iter()
        .map(|repository| {
            parse_owner_repo(&repository.repo).map_err(|e| invalid(format!("{e:#}")))?;
            Regex::new(&repository.milestone_pattern).map_err(|source| {
                PulseError::InvalidPattern {
                    pattern: repository.milestone_pattern.clone(),
                    source,
                }
            })
        })
        .collect()
}

/// Renders the header: day counter line (when a release date is set), the
/// waiting line, then a blank line.
#[must_use]
pub fn render_header(settings: &DigestConfig, now: DateTime<Utc>) -> String {
    let mut header = String::new();
    if let Some(release) = settings.last_release {
        let days = (now.date_naive() - release).num_days();
        let _ = writeln!(header, "**Day {days}** {} ", settings.badge);
    }
    header.push_str(&settings.waiting_line);
    header.push_str("\n\n");
    header
}

/// Renders the footer lines.
#[must_use]
pub fn render_footer(settings: &DigestConfig) -> String {
    settings.footer.join("\n")
}

/// Produces the digest for the window ending at `now`.
///
/// Milestones are resolved per repository, then every query group is fetched
/// with at most `settings.concurrency` in flight. Results are folded in
/// query order, so output does not depend on which request finished first.
///
/// # Errors
///
/// Returns an error when the settings are invalid or when every GitHub call
/// of the run failed.
#[instrument(skip_all, fields(lookback_hours = settings.lookback_hours))]
pub async fn produce_digest(
    api: &dyn GitHubApi,
    settings: &DigestConfig,
    now: DateTime<Utc>,
) -> crate::Result<Digest> {
    let patterns = validate_settings(settings)?;
    let run_id = Uuid::new_v4();
    let window = LookbackWindow::trailing_hours(now, settings.lookback_hours);
    let stats = FetchStats::default();

    let mut sections = Vec::with_capacity(settings.repositories.len());
    let mut milestone_reports: Vec<Vec<MilestoneReport>> = Vec::new();
    let mut jobs = Vec::new();

    for (section, (repository, pattern)) in settings.repositories.iter().zip(&patterns).enumerate() {
        let milestones = resolve_milestones(api, repository, pattern, &window, &stats).await;

        for (index, milestone) in milestones.iter().enumerate() {
            for group in OutcomeGroup::ALL {
                for kind in KINDS {
                    let mut query = group.query(&repository.repo, &milestone.title, kind, window);
                    query.max_pages = settings.max_pages;
                    query.per_page = settings.per_page;
                    jobs.push(Job {
                        section,
                        milestone: index,
                        group,
                        query,
                    });
                }
            }
        }

        sections.push(RepoSection::new(&repository.repo, &repository.heading));
        milestone_reports.push(milestones.iter().map(MilestoneReport::new).collect());
    }

    let results: Vec<_> = stream::iter(&jobs)
        .map(|job| fetch_activity(api, &job.query, &stats))
        .buffered(settings.concurrency)
        .collect()
        .await;

    for (job, items) in jobs.iter().zip(results) {
        let report = milestone_reports[job.section][job.milestone].group_mut(job.group);
        let target = report.kind_mut(job.query.kind);
        for item in items {
            target.push(item);
        }
    }

    for (section, reports) in sections.iter_mut().zip(milestone_reports) {
        for report in reports {
            section.push(report);
        }
    }

    let stats = stats.snapshot();
    if stats.all_failed() {
        warn!(attempted = stats.attempted, "Every GitHub request failed");
        return Err(PulseError::AllRequestsFailed {
            attempted: stats.attempted,
        });
    }

    let report = DigestReport { sections };
    let text = format!(
        "{}{}\n{}",
        render_header(settings, now),
        report.render(),
        render_footer(settings)
    );
    let chunks = split_into_chunks(&text, settings.max_message_chars);

    info!(
        %run_id,
        items = report.item_count(),
        chunks = chunks.len(),
        attempted = stats.attempted,
        failed = stats.failed,
        "Digest produced"
    );

    Ok(Digest {
        run_id,
        window,
        report,
        text,
        chunks,
        stats,
    })
}

/// Like [`produce_digest`], abandoning the run after
/// `settings.run_timeout_seconds`.
///
/// # Errors
///
/// Returns `PulseError::Timeout` when the budget is exceeded, otherwise the
/// errors of [`produce_digest`].
pub async fn produce_digest_with_timeout(
    api: &dyn GitHubApi,
    settings: &DigestConfig,
    now: DateTime<Utc>,
) -> crate::Result<Digest> {
    let budget = Duration::from_secs(settings.run_timeout_seconds);
    tokio::time::timeout(budget, produce_digest(api, settings, now))
        .await
        .map_err(|_| PulseError::Timeout {
            seconds: settings.run_timeout_seconds,
        })?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RepositoryConfig;
    use chrono::{NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 15, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_header_with_release_date() {
        let settings = DigestConfig {
            last_release: NaiveDate::from_ymd_opt(2026, 10, 1),
            ..DigestConfig::default()
        };
        assert_eq!(
            render_header(&settings, now()),
            "**Day 14** :gdcute: \nWaiting for **Godot 4.x dev/beta/rc/stable**\n\n"
        );
    }

    #[test]
    fn test_header_without_release_date() {
        let settings = DigestConfig {
            last_release: None,
            waiting_line: "Waiting".to_string(),
            ..DigestConfig::default()
        };
        assert_eq!(render_header(&settings, now()), "Waiting\n\n");
    }

    #[test]
    fn test_footer_keeps_blank_line() {
        let settings = DigestConfig {
            footer: vec!["a".to_string(), String::new(), "b".to_string()],
            ..DigestConfig::default()
        };
        assert_eq!(render_footer(&settings), "a\n\nb");
    }

    #[test]
    fn test_validate_rejects_bad_pattern() {
        let settings = DigestConfig {
            repositories: vec![RepositoryConfig {
                repo: "o/r".to_string(),
                heading: "R".to_string(),
                milestone_pattern: "(".to_string(),
            }],
            ..DigestConfig::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(PulseError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_repo_and_limits() {
        let bad_repo = DigestConfig {
            repositories: vec![RepositoryConfig {
                repo: "not-a-repo".to_string(),
                heading: "R".to_string(),
                milestone_pattern: "^4".to_string(),
            }],
            ..DigestConfig::default()
        };
        assert!(matches!(
            validate_settings(&bad_repo),
            Err(PulseError::Config { .. })
        ));

        let bad_pages = DigestConfig {
            per_page: 0,
            ..DigestConfig::default()
        };
        assert!(validate_settings(&bad_pages).is_err());

        assert_eq!(validate_settings(&DigestConfig::default()).unwrap().len(), 2);
    }
}
