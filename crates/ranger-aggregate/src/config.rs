//! Aggregation configuration.

use ranger_types::ConfigError;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::GapPolicy;

/// Validated range-bar settings.
///
/// The threshold is always strictly positive, and gap mode always carries a
/// strictly positive tick increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RangeBarConfig {
    threshold: Decimal,
    gap: GapPolicy,
}

impl RangeBarConfig {
    /// Creates a configuration without gaps between bars.
    ///
    /// # Errors
    ///
    /// Returns an error if `threshold <= 0`.
    pub fn new(threshold: Decimal) -> Result<Self, ConfigError> {
        if threshold <= Decimal::ZERO {
            return Err(ConfigError::NonPositiveThreshold(threshold));
        }
        Ok(Self {
            threshold,
            gap: GapPolicy::None,
        })
    }

    /// Creates a configuration that opens each bar one tick past the
    /// previous close.
    ///
    /// # Errors
    ///
    /// Returns an error if `threshold <= 0` or `tick_increment <= 0`.
    pub fn gapped(threshold: Decimal, tick_increment: Decimal) -> Result<Self, ConfigError> {
        Self::new(threshold)?.with_gap(GapPolicy::OneTick {
            increment: tick_increment,
        })
    }

    /// Builds a configuration from loose command-line style options.
    ///
    /// # Errors
    ///
    /// Returns an error if the threshold is not positive, or if `gap` is set
    /// and the tick increment is missing or not positive.
    pub fn from_options(
        threshold: Decimal,
        gap: bool,
        tick_increment: Option<Decimal>,
    ) -> Result<Self, ConfigError> {
        if gap {
            let increment = tick_increment.ok_or(ConfigError::MissingTickIncrement)?;
            Self::gapped(threshold, increment)
        } else {
            Self::new(threshold)
        }
    }

    /// Replaces the gap policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the policy carries a non-positive increment.
    pub fn with_gap(mut self, gap: GapPolicy) -> Result<Self, ConfigError> {
        if let Some(increment) = gap.increment()
            && increment <= Decimal::ZERO
        {
            return Err(ConfigError::NonPositiveTickIncrement(increment));
        }
        self.gap = gap;
        Ok(self)
    }

    /// Returns a copy with a different threshold and the same gap policy.
    ///
    /// # Errors
    ///
    /// Returns an error if `threshold <= 0`.
    pub fn with_threshold(self, threshold: Decimal) -> Result<Self, ConfigError> {
        Self::new(threshold)?.with_gap(self.gap)
    }

    /// Returns the range threshold.
    #[must_use]
    pub const fn threshold(&self) -> Decimal {
        self.threshold
    }

    /// Returns the gap policy.
    #[must_use]
    pub const fn gap(&self) -> GapPolicy {
        self.gap
    }
}
