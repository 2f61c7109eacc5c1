//! Timestamp parsing and rendering.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Rendering used for bar timestamps handed to display and plotting tools.
pub const BAR_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Naive layouts accepted when reading tick and bar files.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses a timestamp as written by exchanges, pandas, or ranger itself.
///
/// RFC 3339 strings keep their offset and are converted to UTC. Values
/// without an offset are interpreted as UTC.
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Renders a bar timestamp as `YYYY-MM-DD HH:MM:SS.ffffff`.
#[must_use]
pub fn format_bar_time(timestamp: DateTime<Utc>) -> String {
    timestamp.format(BAR_TIME_FORMAT).to_string()
}
