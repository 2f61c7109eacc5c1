//! Selector configuration.

use ranger_types::ConfigError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default number of bars aimed for per day.
pub const DEFAULT_TARGET_BARS: usize = 300;

/// Default distance between candidate thresholds.
pub const DEFAULT_STEP: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Default probe budget for [`SearchStrategy::Bisect`].
const DEFAULT_MAX_PROBES: u32 = 8;

/// How candidate thresholds are chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SearchStrategy {
    /// The previous threshold and one step either side of it.
    #[default]
    Neighbors,
    /// Bisection over multiples of the step, in addition to the neighbours.
    ///
    /// Relies on the bar count falling as the threshold grows. The search
    /// covers `[step, 2 * ceil(previous / step) * step]`.
    Bisect {
        /// Maximum number of bisection probes.
        max_probes: u32,
    },
}

impl SearchStrategy {
    /// Bisection with the default probe budget.
    #[must_use]
    pub const fn bisect() -> Self {
        Self::Bisect {
            max_probes: DEFAULT_MAX_PROBES,
        }
    }
}

/// Validated selector settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TuneConfig {
    target_bars: usize,
    step: Decimal,
    strategy: SearchStrategy,
}

impl Default for TuneConfig {
    fn default() -> Self {
        Self {
            target_bars: DEFAULT_TARGET_BARS,
            step: DEFAULT_STEP,
            strategy: SearchStrategy::Neighbors,
        }
    }
}

impl TuneConfig {
    /// Creates a neighbour-search configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `target_bars == 0` or `step <= 0`.
    pub fn new(target_bars: usize, step: Decimal) -> Result<Self, ConfigError> {
        if target_bars == 0 {
            return Err(ConfigError::ZeroTarget);
        }
        if step <= Decimal::ZERO {
            return Err(ConfigError::NonPositiveStep(step));
        }
        Ok(Self {
            target_bars,
            step,
            strategy: SearchStrategy::Neighbors,
        })
    }

    /// Sets the search strategy.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Returns the target bar count.
    #[must_use]
    pub const fn target_bars(&self) -> usize {
        self.target_bars
    }

    /// Returns the candidate step.
    #[must_use]
    pub const fn step(&self) -> Decimal {
        self.step
    }

    /// Returns the search strategy.
    #[must_use]
    pub const fn strategy(&self) -> SearchStrategy {
        self.strategy
    }
}
