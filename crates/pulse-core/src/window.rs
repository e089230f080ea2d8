// SPDX-License-Identifier: Apache-2.0

//! The trailing look-back window a run reports on.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::Serialize;

/// A half-open time interval `[start, end)` ending at the run's reference time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LookbackWindow {
    /// Inclusive start of the window.
    pub start: DateTime<Utc>,
    /// Reference time of the run.
    pub end: DateTime<Utc>,
}

impl LookbackWindow {
    /// The window covering the `hours` before `now`.
    #[must_use]
    pub fn trailing_hours(now: DateTime<Utc>, hours: u64) -> Self {
        let hours = i64::try_from(hours).unwrap_or(i64::MAX);
        let span = Duration::try_hours(hours).unwrap_or(Duration::MAX);
        let start = now.checked_sub_signed(span).unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self { start, end: now }
    }

    /// Whether `at` is at or after the window start.
    #[must_use]
    pub fn includes(&self, at: DateTime<Utc>) -> bool {
        at >= self.start
    }

    /// Whether `at` is strictly after the window start.
    ///
    /// Milestone recency uses the strict form: a milestone last touched
    /// exactly at the window start is stale.
    #[must_use]
    pub fn is_newer(&self, at: DateTime<Utc>) -> bool {
        at > self.start
    }

    /// Window start formatted for GitHub search qualifiers (`2026-10-14T00:00:00Z`).
    #[must_use]
    pub fn start_iso(&self) -> String {
        self.start.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 15, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_trailing_hours_default_day() {
        let window = LookbackWindow::trailing_hours(now(), 24);
        assert_eq!(window.start, Utc.with_ymd_and_hms(2026, 10, 14, 0, 0, 0).unwrap());
        assert_eq!(window.end, now());
    }

    #[test]
    fn test_includes_boundary_is_inclusive() {
        let window = LookbackWindow::trailing_hours(now(), 24);
        assert!(window.includes(window.start));
        assert!(!window.includes(window.start - Duration::seconds(1)));
    }

    #[test]
    fn test_is_newer_boundary_is_exclusive() {
        let window = LookbackWindow::trailing_hours(now(), 24);
        assert!(!window.is_newer(window.start));
        assert!(window.is_newer(window.start + Duration::seconds(1)));
    }

    #[test]
    fn test_start_iso_format() {
        let window = LookbackWindow::trailing_hours(now(), 36);
        assert_eq!(window.start_iso(), "2026-10-13T12:00:00Z");
    }
}
