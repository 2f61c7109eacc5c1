//! Aggregation errors.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised while aggregating ticks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    /// A tick's timestamp is earlier than the one before it.
    #[error("Ticks not sorted at index {index}: previous={previous}, current={current}")]
    UnsortedTicks {
        /// Position of the offending tick.
        index: usize,
        /// Timestamp of the preceding tick.
        previous: DateTime<Utc>,
        /// Timestamp of the offending tick.
        current: DateTime<Utc>,
    },
}
