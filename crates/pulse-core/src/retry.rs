// SPDX-License-Identifier: Apache-2.0

//! Retry policy for webhook delivery.
//!
//! GitHub fetches are never retried: a failed page or event lookup degrades
//! its query group instead. Only posting to the messaging webhook goes
//! through the backoff configured here.

use std::time::Duration;

use backon::ExponentialBuilder;

use crate::delivery::WebhookStatusError;

/// Determines if an HTTP status code is retryable.
///
/// Retryable status codes are:
/// - 429 (Too Many Requests / Rate Limited)
/// - 500 (Internal Server Error)
/// - 502 (Bad Gateway)
/// - 503 (Service Unavailable)
/// - 504 (Gateway Timeout)
#[must_use]
pub fn is_retryable_http(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Determines if an anyhow error is retryable.
///
/// Network timeouts and connection failures from reqwest are transient, as
/// are webhook responses with a retryable status code.
#[must_use]
pub fn is_retryable_anyhow(e: &anyhow::Error) -> bool {
    if let Some(req_err) = e.downcast_ref::<reqwest::Error>() {
        if req_err.is_timeout() || req_err.is_connect() {
            return true;
        }
        if let Some(status) = req_err.status() {
            return is_retryable_http(status.as_u16());
        }
    }

    if let Some(status_err) = e.downcast_ref::<WebhookStatusError>() {
        return is_retryable_http(status_err.status);
    }

    false
}

/// Creates the exponential backoff used for delivery.
///
/// - Factor: 2
/// - Min delay: 1 second
/// - Max times: 3 retries
/// - Jitter: enabled
#[must_use]
pub fn retry_backoff() -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_factor(2.0)
        .with_min_delay(Duration::from_secs(1))
        .with_max_times(3)
        .with_jitter()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable_http_retryable_codes() {
        assert!(is_retryable_http(429));
        assert!(is_retryable_http(500));
        assert!(is_retryable_http(502));
        assert!(is_retryable_http(503));
        assert!(is_retryable_http(504));
    }

    #[test]
    fn test_is_retryable_http_non_retryable_codes() {
        assert!(!is_retryable_http(400));
        assert!(!is_retryable_http(401));
        assert!(!is_retryable_http(403));
        assert!(!is_retryable_http(404));
        assert!(!is_retryable_http(200));
    }

    #[test]
    fn test_is_retryable_anyhow_with_webhook_status() {
        let transient = anyhow::anyhow!(WebhookStatusError {
            status: 503,
            body: String::new(),
        });
        assert!(is_retryable_anyhow(&transient));

        let permanent = anyhow::anyhow!(WebhookStatusError {
            status: 404,
            body: "Unknown Webhook".to_string(),
        });
        assert!(!is_retryable_anyhow(&permanent));
    }

    #[test]
    fn test_is_retryable_anyhow_with_other_error() {
        let err = anyhow::anyhow!("some other error");
        assert!(!is_retryable_anyhow(&err));
    }

    #[test]
    fn test_retry_backoff_configuration() {
        let _: ExponentialBuilder = retry_backoff();
    }
}
