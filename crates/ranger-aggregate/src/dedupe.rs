//! Timestamp de-duplication.
//!
//! Many ticks, and therefore many bars, share a wall-clock timestamp.
//! Charting tools key rows by time, so repeated timestamps are shifted
//! forward by one millisecond per repeat.
//!
//! Uniqueness is only guaranteed while a timestamp repeats fewer than 1000
//! times and no shifted value lands on a later timestamp that occurs
//! naturally in the data.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use ranger_types::Tick;
use tracing::warn;

use crate::RangeBar;

/// Repeat count at which shifted timestamps spill into the next second.
const SATURATION: u32 = 1000;

/// A row carrying a timestamp that can be rewritten.
pub trait Timestamped {
    /// Returns the row's timestamp.
    fn timestamp(&self) -> DateTime<Utc>;

    /// Replaces the row's timestamp.
    fn set_timestamp(&mut self, timestamp: DateTime<Utc>);
}

impl Timestamped for Tick {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn set_timestamp(&mut self, timestamp: DateTime<Utc>) {
        self.timestamp = timestamp;
    }
}

impl Timestamped for RangeBar {
    fn timestamp(&self) -> DateTime<Utc> {
        self.open_time
    }

    fn set_timestamp(&mut self, timestamp: DateTime<Utc>) {
        self.open_time = timestamp;
    }
}

/// Single-pass timestamp deduplicator.
///
/// Repeats are counted per original timestamp for the lifetime of this
/// value only; independent archives should use independent instances.
#[derive(Debug, Default)]
pub struct TimestampDeduplicator {
    seen: HashMap<DateTime<Utc>, u32>,
    shifted: usize,
}

impl TimestampDeduplicator {
    /// Creates an empty deduplicator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the unique timestamp to use for the next row stamped `original`.
    pub fn unique(&mut self, original: DateTime<Utc>) -> DateTime<Utc> {
        match self.seen.get_mut(&original) {
            None => {
                self.seen.insert(original, 0);
                original
            }
            Some(count) => {
                *count += 1;
                if *count == SATURATION {
                    warn!(
                        timestamp = %original,
                        "timestamp repeated {SATURATION} times; shifted values may collide"
                    );
                }
                self.shifted += 1;
                original + TimeDelta::milliseconds(i64::from(*count))
            }
        }
    }

    /// Rewrites a row's timestamp in place.
    pub fn apply<T: Timestamped>(&mut self, row: &mut T) {
        let unique = self.unique(row.timestamp());
        row.set_timestamp(unique);
    }

    /// Returns how many rows have been shifted so far.
    #[must_use]
    pub const fn shifted(&self) -> usize {
        self.shifted
    }
}

/// Returns the rows with repeated timestamps shifted to be distinct.
///
/// Order, length, and every other field are preserved.
pub fn dedupe_timestamps<T: Timestamped>(rows: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut dedup = TimestampDeduplicator::new();
    rows.into_iter()
        .map(|mut row| {
            dedup.apply(&mut row);
            row
        })
        .collect()
}
