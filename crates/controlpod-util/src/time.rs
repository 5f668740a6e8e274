//! Wall-clock time for the watchdog
//!
//! Heartbeat age is wall-clock arithmetic: the marker carries an absolute
//! timestamp written by another process, so a monotonic clock is of no use.
//! The clock is injected through the [`Clock`] trait so tests can pin "now".
//!
//! # Mock Time for Field Rehearsal
//!
//! In debug builds, the `CONTROLPOD_MOCK_TIME` environment variable can be set
//! to shift the system clock seen by [`SystemClock`]. The mock time advances
//! at the real rate from the moment the process started.
//!
//! Format: `YYYY-MM-DD HH:MM:SS` in local time (e.g., `2025-12-25 14:30:00`)
//!
//! Example:
//! ```bash
//! CONTROLPOD_MOCK_TIME="2025-12-25 14:30:00" ./target/debug/controlpod-watchdog
//! ```

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use std::sync::OnceLock;

/// Environment variable name for mock time (debug builds only)
pub const MOCK_TIME_ENV_VAR: &str = "CONTROLPOD_MOCK_TIME";

const MOCK_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static MOCK_TIME_OFFSET: OnceLock<Option<chrono::Duration>> = OnceLock::new();

/// Source of the current wall-clock time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real system clock, shifted by `CONTROLPOD_MOCK_TIME` in debug builds
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        now()
    }
}

/// A clock pinned to one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

#[cfg_attr(not(debug_assertions), allow(dead_code))]
fn parse_mock_time(raw: &str) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(raw.trim(), MOCK_TIME_FORMAT).ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

fn get_mock_time_offset() -> Option<chrono::Duration> {
    *MOCK_TIME_OFFSET.get_or_init(|| {
        #[cfg(debug_assertions)]
        {
            let raw = std::env::var(MOCK_TIME_ENV_VAR).ok()?;
            match parse_mock_time(&raw) {
                Some(mock) => {
                    let offset = mock.signed_duration_since(Utc::now());
                    tracing::debug!(
                        mock_time = %raw,
                        offset_secs = offset.num_seconds(),
                        "Mock time enabled"
                    );
                    Some(offset)
                }
                None => {
                    tracing::warn!(
                        mock_time = %raw,
                        expected_format = MOCK_TIME_FORMAT,
                        "Invalid mock time format"
                    );
                    None
                }
            }
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    })
}

/// Returns whether mock time is currently active.
pub fn is_mock_time_active() -> bool {
    get_mock_time_offset().is_some()
}

/// Current UTC time, respecting mock time in debug builds.
pub fn now() -> DateTime<Utc> {
    let real_now = Utc::now();
    match get_mock_time_offset() {
        Some(offset) => real_now + offset,
        None => real_now,
    }
}

/// Format a signed age in seconds for log and summary lines.
pub fn format_age(seconds: i64) -> String {
    if seconds < 0 {
        return format!("-{}", format_age(seconds.saturating_neg()));
    }
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}
