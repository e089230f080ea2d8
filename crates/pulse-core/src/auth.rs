// SPDX-License-Identifier: Apache-2.0

//! Token provider abstraction for credential resolution.
//!
//! The digest only needs a GitHub token. Hosts (the CLI, a chat bot, a test
//! harness) implement `TokenProvider` to supply it from their own source.

use secrecy::SecretString;

/// Provides GitHub credentials for API calls.
///
/// Implementations should handle credential lookup and return `None` if
/// credentials are not available.
pub trait TokenProvider: Send + Sync {
    /// Retrieves the GitHub API token.
    ///
    /// Returns `None` if no token is available from any source.
    fn github_token(&self) -> Option<SecretString>;
}

/// A `TokenProvider` backed by a fixed token.
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: SecretString,
}

impl StaticTokenProvider {
    /// Wraps an already-resolved token.
    #[must_use]
    pub fn new(token: SecretString) -> Self {
        Self { token }
    }
}

impl TokenProvider for StaticTokenProvider {
    fn github_token(&self) -> Option<SecretString> {
        Some(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    struct MissingTokenProvider;

    impl TokenProvider for MissingTokenProvider {
        fn github_token(&self) -> Option<SecretString> {
            None
        }
    }

    #[test]
    fn test_static_provider_returns_token() {
        let provider = StaticTokenProvider::new(SecretString::from("gh_token".to_string()));
        let token = provider.github_token().expect("token");
        assert_eq!(token.expose_secret(), "gh_token");
    }

    #[test]
    fn test_missing_provider_returns_none() {
        assert!(MissingTokenProvider.github_token().is_none());
    }
}
