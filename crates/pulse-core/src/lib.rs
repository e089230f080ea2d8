// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! # Pulse Core
//!
//! Core library for Pulse - a scheduled digest of GitHub milestone activity.
//!
//! This crate provides reusable components for:
//! - Resolving active milestones of watched repositories
//! - Paginated, deduplicated issue and pull request search
//! - Topic classification and the typed report tree
//! - Rendering and splitting the report into message-sized chunks
//! - Webhook delivery and per-channel command cooldowns
//!
//! ## Quick Start
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
//! println!("{} chunks", digest.chunks.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Configuration loading and paths
//! - [`error`] - Error types
//! - [`github`] - GitHub API seam, octocrab client, wire types
//! - [`digest`] - The end-to-end facade
//! - [`delivery`] - Webhook posting
//! - [`gate`] - Command cooldowns

// ============================================================================
// Authentication
// ============================================================================

pub use auth::{StaticTokenProvider, TokenProvider};

// ============================================================================
// Error Handling
// ============================================================================

pub use error::PulseError;

/// Convenience Result type for Pulse operations.
///
/// This is equivalent to `std::result::Result<T, PulseError>`.
pub type Result<T> = std::result::Result<T, PulseError>;

// ============================================================================
// Configuration
// ============================================================================

pub use config::{
    AppConfig, DeliveryConfig, DigestConfig, GateConfig, GitHubConfig, RepositoryConfig,
    ScheduleConfig, config_dir, config_file_path, data_dir, load_config,
};

// ============================================================================
// GitHub Integration
// ============================================================================

pub use github::GitHubApi;
pub use github::auth::{TokenSource, resolve_token};
pub use github::client::OctocrabApi;

// ============================================================================
// Digest Pipeline
// ============================================================================

pub use activity::{ActivityItem, EntityKind, Outcome};
pub use chunk::split_into_chunks;
pub use classify::{classify, display_name};
pub use digest::{Digest, produce_digest, produce_digest_with_timeout};
pub use fetch::{OutcomeGroup, RequestStats};
pub use milestones::{Milestone, resolve_milestones};
pub use report::{CategoryGroup, DigestReport, GroupReport, KindReport, MilestoneReport, RepoSection};
pub use window::LookbackWindow;

// ============================================================================
// Delivery
// ============================================================================

pub use delivery::WebhookClient;
pub use gate::{CooldownGate, GateState};

// ============================================================================
// Retry Logic
// ============================================================================

pub use retry::{is_retryable_anyhow, is_retryable_http, retry_backoff};

// ============================================================================
// Modules
// ============================================================================

pub mod activity;
pub mod auth;
pub mod chunk;
pub mod classify;
pub mod config;
pub mod delivery;
pub mod digest;
pub mod error;
pub mod fetch;
pub mod gate;
pub mod github;
pub mod milestones;
pub mod report;
pub mod retry;
pub mod window;
