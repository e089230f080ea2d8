// SPDX-License-Identifier: Apache-2.0

//! GitHub integration module.
//!
//! The digest talks to GitHub only through [`GitHubApi`], which covers the
//! three read-only endpoints it needs. [`client::OctocrabApi`] is the
//! production implementation; tests script their own.

use anyhow::Result;
use async_trait::async_trait;

pub mod auth;
pub mod client;
pub mod types;

use types::{IssueEvent, MilestoneRecord, SearchPage};

/// Read-only access to the GitHub endpoints used by the digest.
///
/// Implementations must apply their own per-request timeout; callers treat
/// any `Err` as "this call yielded nothing".
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Lists open milestones of `repo` (`owner/name`).
    async fn list_milestones(&self, repo: &str) -> Result<Vec<MilestoneRecord>>;

    /// Runs one page of an issue search. Pages are 1-based.
    async fn search_issues(&self, query: &str, page: u32, per_page: u8) -> Result<SearchPage>;

    /// Lists the event timeline of one issue or pull request.
    async fn issue_events(&self, repo: &str, number: u64) -> Result<Vec<IssueEvent>>;
}

/// Parses an owner/repo string to extract owner and repo.
///
/// Validates format: exactly one `/`, non-empty parts.
///
/// # Errors
///
/// Returns an error if the format is invalid.
pub fn parse_owner_repo(s: &str) -> Result<(String, String)> {
    let parts: Vec<&str> = s.split('/').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        anyhow::bail!(
            "Invalid owner/repo format.\n\
             Expected: owner/repo\n\
             Got: {s}"
        );
    }
    Ok((parts[0].to_string(), parts[1].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_owner_repo_valid() {
        let (owner, repo) = parse_owner_repo("godotengine/godot").unwrap();
        assert_eq!(owner, "godotengine");
        assert_eq!(repo, "godot");
    }

    #[test]
    fn test_parse_owner_repo_invalid_no_slash() {
        assert!(parse_owner_repo("godot").is_err());
    }

    #[test]
    fn test_parse_owner_repo_invalid_empty_owner() {
        assert!(parse_owner_repo("/godot").is_err());
    }

    #[test]
    fn test_parse_owner_repo_invalid_extra_segment() {
        assert!(parse_owner_repo("godotengine/godot/issues").is_err());
    }
}
