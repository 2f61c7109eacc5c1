//! Threshold selection errors.

use ranger_aggregate::AggregateError;
use ranger_types::ConfigError;
use thiserror::Error;

/// Errors raised while selecting a threshold.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TuneError {
    /// Invalid target, step or starting threshold.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The day's ticks could not be aggregated.
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}
