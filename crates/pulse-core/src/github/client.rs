// SPDX-License-Identifier: Apache-2.0

//! Octocrab-backed implementation of [`GitHubApi`].

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::GitHubApi;
use super::auth::create_client_with_token;
use super::types::{IssueEvent, MilestoneRecord, SearchPage};
use crate::auth::TokenProvider;
use crate::config::GitHubConfig;
use crate::error::PulseError;

/// Page size for milestone and event listings.
const LIST_PAGE_SIZE: u8 = 100;

/// Upper bound on event pages read for one item.
const MAX_EVENT_PAGES: u32 = 10;

#[derive(Serialize)]
struct MilestoneParams {
    state: &'static str,
    per_page: u8,
}

#[derive(Serialize)]
struct SearchParams<'a> {
    q: &'a str,
    per_page: u8,
    page: u32,
    sort: &'static str,
}

#[derive(Serialize)]
struct PageParams {
    per_page: u8,
    page: u32,
}

/// GitHub REST client used by the digest.
///
/// Wraps every request in a timeout so a stalled connection degrades one
/// query group instead of stalling the run.
#[derive(Debug, Clone)]
pub struct OctocrabApi {
    client: Octocrab,
    timeout: Duration,
}

impl OctocrabApi {
    /// Wraps an existing Octocrab client.
    #[must_use]
    pub fn new(client: Octocrab, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Builds a client from configuration, resolving the token through `provider`.
    ///
    /// # Errors
    ///
    /// Returns `PulseError::NotAuthenticated` if the provider has no token, or
    /// `PulseError::Config` if the client cannot be built.
    pub fn from_config(
        provider: &dyn TokenProvider,
        config: &GitHubConfig,
    ) -> crate::Result<Self> {
        let token = provider.github_token().ok_or(PulseError::NotAuthenticated)?;
        let client =
            create_client_with_token(&token, config).map_err(|e| PulseError::Config {
                message: format!("{e:#}"),
            })?;
        Ok(Self::new(
            client,
            Duration::from_secs(config.api_timeout_seconds),
        ))
    }

    async fn get<T, P>(&self, route: &str, params: &P) -> Result<T>
    where
        T: DeserializeOwned,
        P: Serialize + Sync,
    {
        let request = self.client.get::<T, _, P>(route, Some(params));
        match tokio::time::timeout(self.timeout, request).await {
            Ok(result) => result.with_context(|| format!("GitHub request to {route} failed")),
            Err(_) => anyhow::bail!(
                "GitHub request to {route} timed out after {}s",
                self.timeout.as_secs()
            ),
        }
    }
}

#[async_trait]
impl GitHubApi for OctocrabApi {
    #[instrument(skip(self))]
    async fn list_milestones(&self, repo: &str) -> Result<Vec<MilestoneRecord>> {
        let route = format!("/repos/{repo}/milestones");
        let params = MilestoneParams {
            state: "open",
            per_page: LIST_PAGE_SIZE,
        };
        let milestones: Vec<MilestoneRecord> = self.get(&route, &params).await?;
        debug!(count = milestones.len(), "Listed milestones");
        Ok(milestones)
    }

    #[instrument(skip(self))]
    async fn search_issues(&self, query: &str, page: u32, per_page: u8) -> Result<SearchPage> {
        let params = SearchParams {
            q: query,
            per_page,
            page,
            sort: "updated",
        };
        let result: SearchPage = self.get("/search/issues", &params).await?;
        debug!(
            total_count = result.total_count,
            items = result.items.len(),
            "Search page fetched"
        );
        Ok(result)
    }

    #[instrument(skip(self))]
    async fn issue_events(&self, repo: &str, number: u64) -> Result<Vec<IssueEvent>> {
        let route = format!("/repos/{repo}/issues/{number}/events");
        let mut events = Vec::new();

        for page in 1..=MAX_EVENT_PAGES {
            let params = PageParams {
                per_page: LIST_PAGE_SIZE,
                page,
            };
            let batch: Vec<IssueEvent> = self.get(&route, &params).await?;
            let last_page = batch.len() < usize::from(LIST_PAGE_SIZE);
            events.extend(batch);
            if last_page {
                break;
            }
        }

        debug!(count = events.len(), "Fetched issue events");
        Ok(events)
    }
}
