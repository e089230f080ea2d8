// SPDX-License-Identifier: Apache-2.0

//! Posting digest chunks to a Discord-compatible webhook.

use std::time::Duration;

use anyhow::Context;
use backon::{ExponentialBuilder, Retryable};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::config::DeliveryConfig;
use crate::error::PulseError;
use crate::retry::{is_retryable_anyhow, retry_backoff};

/// Non-success response from the webhook.
#[derive(Debug, Error)]
#[error("webhook returned HTTP {status}: {body}")]
pub struct WebhookStatusError {
    /// HTTP status code.
    pub status: u16,
    /// Response body, possibly empty.
    pub body: String,
}

#[derive(Serialize)]
struct WebhookMessage<'a> {
    content: &'a str,
}

/// Client for one webhook endpoint.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    http: reqwest::Client,
    url: SecretString,
    backoff: ExponentialBuilder,
}

impl WebhookClient {
    /// Creates a client posting to `url`.
    ///
    /// # Errors
    ///
    /// Returns `PulseError::Network` if the HTTP client cannot be built.
    pub fn new(url: SecretString, timeout: Duration) -> crate::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url,
            backoff: retry_backoff(),
        })
    }

    /// Creates a client from the delivery settings.
    ///
    /// # Errors
    ///
    /// Returns `PulseError::Config` when no webhook URL is configured.
    pub fn from_config(config: &DeliveryConfig) -> crate::Result<Self> {
        let url = config
            .webhook_url
            .clone()
            .ok_or_else(|| PulseError::Config {
                message: "delivery.webhook_url is not set".to_string(),
            })?;
        Self::new(
            SecretString::from(url),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    /// Replaces the retry backoff.
    #[must_use]
    pub fn with_backoff(mut self, backoff: ExponentialBuilder) -> Self {
        self.backoff = backoff;
        self
    }

    async fn post_chunk(&self, content: &str) -> anyhow::Result<()> {
        let response = self
            .http
            .post(self.url.expose_secret())
            .json(&WebhookMessage { content })
            .send()
            .await
            .context("Failed to send webhook request")?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(WebhookStatusError {
            status: status.as_u16(),
            body,
        }
        .into())
    }

    /// Posts `chunks` in order, one message each.
    ///
    /// Transient failures are retried with backoff. The first chunk that still
    /// fails stops delivery; later chunks are not sent.
    ///
    /// # Errors
    ///
    /// Returns `PulseError::Delivery` naming the failed chunk.
    #[instrument(skip_all, fields(chunks = chunks.len()))]
    pub async fn deliver_chunks(&self, chunks: &[String]) -> crate::Result<()> {
        let total = chunks.len();
        for (index, chunk) in chunks.iter().enumerate() {
            let number = index + 1;
            (|| async { self.post_chunk(chunk).await })
                .retry(self.backoff)
                .when(is_retryable_anyhow)
                .notify(|err, dur| {
                    warn!(
                        error = %err,
                        delay_ms = dur.as_millis(),
                        chunk = number,
                        "Retrying webhook delivery"
                    );
                })
                .await
                .map_err(|e| PulseError::Delivery {
                    chunk: number,
                    total,
                    message: format!("{e:#}"),
                })?;
            debug!(chunk = number, total, "Chunk delivered");
        }
        info!(total, "Digest delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn fast_backoff() -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(1))
            .with_max_delay(Duration::from_millis(5))
            .with_max_times(3)
    }

    fn client(server: &MockServer) -> WebhookClient {
        WebhookClient::new(
            SecretString::from(server.url("/api/webhooks/1/token")),
            Duration::from_secs(5),
        )
        .unwrap()
        .with_backoff(fast_backoff())
    }

    #[tokio::test]
    async fn test_delivers_chunks_in_order() {
        let server = MockServer::start();
        let first = server.mock(|when, then| {
            when.method(POST)
                .path("/api/webhooks/1/token")
                .json_body(json!({"content": "part one"}));
            then.status(204);
        });
        let second = server.mock(|when, then| {
            when.method(POST)
                .path("/api/webhooks/1/token")
                .json_body(json!({"content": "part two"}));
            then.status(204);
        });

        let chunks = vec!["part one".to_string(), "part two".to_string()];
        client(&server).deliver_chunks(&chunks).await.unwrap();

        first.assert_calls(1);
        second.assert_calls(1);
    }

    #[tokio::test]
    async fn test_permanent_failure_stops_delivery() {
        let server = MockServer::start();
        let rejected = server.mock(|when, then| {
            when.method(POST)
                .path("/api/webhooks/1/token")
                .json_body(json!({"content": "first"}));
            then.status(404).body("Unknown Webhook");
        });
        let never = server.mock(|when, then| {
            when.method(POST)
                .path("/api/webhooks/1/token")
                .json_body(json!({"content": "second"}));
            then.status(204);
        });

        let chunks = vec!["first".to_string(), "second".to_string()];
        let err = client(&server).deliver_chunks(&chunks).await.unwrap_err();

        assert!(matches!(
            err,
            PulseError::Delivery {
                chunk: 1,
                total: 2,
                ..
            }
        ));
        assert!(err.to_string().contains("404"));
        rejected.assert_calls(1);
        never.assert_calls(0);
    }

    #[tokio::test]
    async fn test_transient_failure_is_retried() {
        let server = MockServer::start();
        let unavailable = server.mock(|when, then| {
            when.method(POST).path("/api/webhooks/1/token");
            then.status(503);
        });

        let chunks = vec!["only".to_string()];
        let err = client(&server).deliver_chunks(&chunks).await.unwrap_err();

        assert!(matches!(err, PulseError::Delivery { chunk: 1, .. }));
        unavailable.assert_calls(4);
    }

    #[test]
    fn test_from_config_requires_url() {
        let config = DeliveryConfig::default();
        assert!(matches!(
            WebhookClient::from_config(&config),
            Err(PulseError::Config { .. })
        ));
    }
}
