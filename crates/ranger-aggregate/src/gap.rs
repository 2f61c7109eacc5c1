//! Price gap between consecutive range bars.

use ranger_types::Tick;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::RangeBar;

/// Direction in which a bar broke out of its range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Breakout {
    /// The bar closed on its high.
    Up,
    /// The bar closed on its low.
    Down,
}

impl Breakout {
    /// Returns the breakout direction of a closed bar.
    #[must_use]
    pub fn of(bar: &RangeBar) -> Self {
        if bar.closed_on_high() {
            Self::Up
        } else {
            Self::Down
        }
    }
}

/// How the next bar opens after a bar closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum GapPolicy {
    /// The next tick opens the next bar at its own price.
    #[default]
    None,
    /// The next bar opens synthetically one tick increment beyond the close,
    /// in the breakout direction.
    OneTick {
        /// Minimum price step of the instrument.
        increment: Decimal,
    },
}

impl GapPolicy {
    /// Returns true if bars are separated by a gap.
    #[must_use]
    pub const fn is_gapped(&self) -> bool {
        matches!(self, Self::OneTick { .. })
    }

    /// Returns the tick increment, if gap mode is enabled.
    #[must_use]
    pub const fn increment(&self) -> Option<Decimal> {
        match self {
            Self::None => None,
            Self::OneTick { increment } => Some(*increment),
        }
    }

    /// Returns the synthetic opening price of the bar following `closed`,
    /// or `None` when the next tick should open it.
    #[must_use]
    pub fn next_open(&self, closed: &RangeBar) -> Option<Decimal> {
        let increment = self.increment()?;
        Some(match Breakout::of(closed) {
            Breakout::Up => closed.close + increment,
            Breakout::Down => closed.close - increment,
        })
    }
}

/// Estimates the instrument tick size as the smallest non-zero absolute
/// change between consecutive prices.
///
/// Returns `None` when fewer than two distinct consecutive prices exist.
#[must_use]
pub fn infer_tick_size(ticks: &[Tick]) -> Option<Decimal> {
    ticks
        .windows(2)
        .map(|pair| (pair[1].price - pair[0].price).abs())
        .filter(|change| !change.is_zero())
        .min()
}
