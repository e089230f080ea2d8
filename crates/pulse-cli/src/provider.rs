// SPDX-License-Identifier: Apache-2.0

//! CLI-specific `TokenProvider` implementation.
//!
//! Resolves the GitHub token from the config file, `GH_TOKEN`,
//! `GITHUB_TOKEN`, or the GitHub CLI, in that order.

use pulse_core::auth::TokenProvider;
use pulse_core::github::auth::resolve_token;
use secrecy::SecretString;
use tracing::debug;

/// CLI implementation of `TokenProvider`.
pub struct CliTokenProvider {
    configured: Option<String>,
}

impl CliTokenProvider {
    /// Creates a provider that prefers `configured` (from `github.token`).
    pub fn new(configured: Option<String>) -> Self {
        Self { configured }
    }
}

impl TokenProvider for CliTokenProvider {
    fn github_token(&self) -> Option<SecretString> {
        if let Some((token, source)) = resolve_token(self.configured.as_deref()) {
            debug!(%source, "Resolved GitHub token");
            Some(token)
        } else {
            debug!("No GitHub token found in CLI sources");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_configured_token_wins() {
        let provider = CliTokenProvider::new(Some("ghp_configured".to_string()));
        let token = provider.github_token().unwrap();
        assert_eq!(token.expose_secret(), "ghp_configured");
    }
}
