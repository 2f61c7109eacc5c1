//! Trade tick representation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single recorded trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tick {
    /// Time of the trade (UTC).
    #[serde(rename = "datetime")]
    pub timestamp: DateTime<Utc>,
    /// Trade price.
    #[serde(rename = "last")]
    pub price: Decimal,
    /// Traded quantity.
    pub volume: Decimal,
}

impl Tick {
    /// Creates a new tick.
    #[must_use]
    pub const fn new(timestamp: DateTime<Utc>, price: Decimal, volume: Decimal) -> Self {
        Self {
            timestamp,
            price,
            volume,
        }
    }

    /// Returns the traded notional (price * volume).
    #[must_use]
    pub fn notional(&self) -> Decimal {
        self.price * self.volume
    }
}

/// Returns the index of the first tick whose timestamp is earlier than its
/// predecessor's, or `None` if the sequence is non-decreasing.
#[must_use]
pub fn first_unsorted(ticks: &[Tick]) -> Option<usize> {
    ticks
        .windows(2)
        .position(|pair| pair[1].timestamp < pair[0].timestamp)
        .map(|i| i + 1)
}
