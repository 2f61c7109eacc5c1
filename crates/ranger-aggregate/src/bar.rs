//! Range bar data structure.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// OHLCV bar whose extent is bounded by a price range instead of a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangeBar {
    /// Timestamp of the tick that opened the bar.
    #[serde(rename = "datetime")]
    pub open_time: DateTime<Utc>,
    /// Opening price.
    pub open: Decimal,
    /// Highest price seen in the bar.
    pub high: Decimal,
    /// Lowest price seen in the bar.
    pub low: Decimal,
    /// Price of the last tick in the bar.
    pub close: Decimal,
    /// Total traded volume.
    pub volume: Decimal,
    /// Range threshold the bar was built with.
    #[serde(rename = "size")]
    pub threshold: Decimal,
}

impl RangeBar {
    /// Creates a new range bar.
    #[must_use]
    pub const fn new(
        open_time: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
        threshold: Decimal,
    ) -> Self {
        Self {
            open_time,
            open,
            high,
            low,
            close,
            volume,
            threshold,
        }
    }

    /// Returns the price range (high - low).
    #[must_use]
    pub fn range(&self) -> Decimal {
        self.high - self.low
    }

    /// Returns true if the range reached the threshold.
    ///
    /// Only the final bar of a stream may be incomplete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.range() >= self.threshold
    }

    /// Returns true if the bar closed on its high.
    #[must_use]
    pub fn closed_on_high(&self) -> bool {
        self.close == self.high
    }

    /// Returns true if this is a bullish bar.
    #[must_use]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Returns true if this is a bearish bar.
    #[must_use]
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Returns the trading day the bar opened on.
    #[must_use]
    pub fn day(&self) -> NaiveDate {
        self.open_time.date_naive()
    }

    /// Checks the OHLC ordering invariants.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.low <= self.high
            && self.low <= self.open
            && self.open <= self.high
            && self.low <= self.close
            && self.close <= self.high
            && self.volume >= Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn create_test_bar(open: i64, high: i64, low: i64, close: i64) -> RangeBar {
        let open_time = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        RangeBar::new(
            open_time,
            Decimal::from(open),
            Decimal::from(high),
            Decimal::from(low),
            Decimal::from(close),
            Decimal::from(12),
            Decimal::from(10),
        )
    }

    #[test]
    fn test_range_and_completion() {
        let bar = create_test_bar(100, 105, 90, 90);
        assert_eq!(bar.range(), Decimal::from(15));
        assert!(bar.is_complete());

        let partial = create_test_bar(95, 97, 95, 96);
        assert!(!partial.is_complete());
    }

    #[test]
    fn test_direction() {
        let down = create_test_bar(100, 105, 90, 90);
        assert!(down.is_bearish());
        assert!(!down.closed_on_high());

        let up = create_test_bar(100, 110, 100, 110);
        assert!(up.is_bullish());
        assert!(up.closed_on_high());
    }

    #[test]
    fn test_validity() {
        assert!(create_test_bar(100, 105, 90, 90).is_valid());
        assert!(!create_test_bar(100, 105, 90, 80).is_valid());
        assert!(!create_test_bar(110, 105, 90, 95).is_valid());
    }

    #[test]
    fn test_serialized_names() {
        let json = serde_json::to_string(&create_test_bar(100, 105, 90, 90)).unwrap();
        assert!(json.contains("\"datetime\""));
        assert!(json.contains("\"size\":\"10\""));
        assert!(!json.contains("threshold"));
    }
}
