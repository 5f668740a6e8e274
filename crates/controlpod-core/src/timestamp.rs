//! Heartbeat timestamp parsing
//!
//! Parsing is a pure function from text to an optional instant, injected
//! into the evaluator through [`TimestampParser`]. The default,
//! [`parse_flexible`], is locale independent and accepts the forms the
//! controlled service and common shell tooling produce.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Turns marker text into an absolute instant
pub trait TimestampParser: Send + Sync {
    fn parse(&self, raw: &str) -> Option<DateTime<Utc>>;
}

impl<F> TimestampParser for F
where
    F: Fn(&str) -> Option<DateTime<Utc>> + Send + Sync,
{
    fn parse(&self, raw: &str) -> Option<DateTime<Utc>> {
        self(raw)
    }
}

/// Explicit-offset layouts, tried in order
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%d %H:%M:%S%.f %:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
];

/// Layouts without an offset; interpreted in local time unless a zone word
/// was stripped
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Trailing zone words that mean UTC
const UTC_SUFFIXES: &[&str] = &[" UTC", " GMT", " Z", "UTC", "GMT", "Z"];

/// Parse a heartbeat timestamp in any supported layout
///
/// Supported, in order of preference:
/// - RFC 3339 (`2024-01-01T12:00:00.5+00:00`, `...Z`)
/// - `YYYY-MM-DD HH:MM:SS[.f]±ZZZZ` and `±ZZ:ZZ`, with `T` or space
/// - RFC 2822 (`Mon, 01 Jan 2024 12:00:00 +0000`)
/// - `@<unix seconds>`
/// - naive date-times followed by `UTC`, `GMT` or `Z`
/// - naive date-times and bare dates, in local time
pub fn parse_flexible(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(epoch) = s.strip_prefix('@') {
        let seconds: i64 = epoch.trim().parse().ok()?;
        return DateTime::from_timestamp(seconds, 0);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for suffix in UTC_SUFFIXES {
        if let Some(rest) = s.strip_suffix(suffix)
            && let Some(naive) = parse_naive(rest.trim_end())
        {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    let naive = parse_naive(s)?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_naive(s: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
