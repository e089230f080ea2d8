// SPDX-License-Identifier: Apache-2.0

//! Cron-driven run loop for `pulse serve`.
//!
//! Runs are strictly sequential: the next occurrence is computed only after
//! the previous run returned, so a slow run delays the next one instead of
//! overlapping it.

use std::future::Future;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use cron::Schedule;
use tracing::{error, info};

/// A parsed cron expression evaluated in UTC.
#[derive(Debug, Clone)]
pub struct RunSchedule {
    expression: String,
    schedule: Schedule,
}

impl RunSchedule {
    /// Parses a cron expression with a seconds field (`0 0 0 * * *`).
    ///
    /// # Errors
    ///
    /// Returns an error if the expression does not parse.
    pub fn parse(expression: &str) -> Result<Self> {
        let schedule = Schedule::from_str(expression)
            .with_context(|| format!("invalid cron expression '{expression}'"))?;
        Ok(Self {
            expression: expression.to_string(),
            schedule,
        })
    }

    /// First occurrence strictly after `from`.
    ///
    /// # Errors
    ///
    /// Returns an error if the expression has no future occurrence.
    pub fn next_after(&self, from: DateTime<Utc>) -> Result<DateTime<Utc>> {
        self.schedule
            .after(&from)
            .next()
            .ok_or_else(|| anyhow!("cron expression '{}' has no future occurrence", self.expression))
    }
}

/// Sleeps until each occurrence and runs `job` with the occurrence time.
///
/// A failed run is logged and the loop waits for the next occurrence; there is
/// no retry within an occurrence. Returns on Ctrl-C.
///
/// # Errors
///
/// Returns an error only if no next occurrence can be computed.
pub async fn run_forever<F, Fut>(schedule: &RunSchedule, mut job: F) -> Result<()>
where
    F: FnMut(DateTime<Utc>) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    loop {
        let now = Utc::now();
        let next = schedule.next_after(now)?;
        let wait = (next - now).to_std().unwrap_or_default();
        info!(next = %next, wait_secs = wait.as_secs(), "Waiting for next digest run");

        tokio::select! {
            () = tokio::time::sleep(wait) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl-C, stopping scheduler");
                return Ok(());
            }
        }

        if let Err(e) = job(next).await {
            error!(error = %format!("{e:#}"), occurrence = %next, "Digest run failed");
        }
    }
}
