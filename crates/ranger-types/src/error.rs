//! Error types for ranger.

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type alias for ranger operations.
pub type Result<T> = std::result::Result<T, RangerError>;

/// Errors that can occur while reading tick files and bar archives.
#[derive(Error, Debug)]
pub enum RangerError {
    /// Invalid aggregation or tuning configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Malformed file contents.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A required column is absent from the file header or schema.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// The file extension is not a recognized tick format.
    #[error("Unsupported file: {0}")]
    UnsupportedFile(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow/Parquet error.
    #[error("Parquet error: {0}")]
    Parquet(String),

    /// A ZIP archive could not be opened or holds no readable entry.
    #[error("ZIP error: {0}")]
    Zip(String),
}

/// Invalid configuration, rejected before any tick is processed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The range threshold must be strictly positive.
    #[error("Invalid threshold: {0} (must be > 0)")]
    NonPositiveThreshold(Decimal),

    /// Gap mode was requested without a tick increment.
    #[error("Gap mode requires a tick increment")]
    MissingTickIncrement,

    /// The tick increment must be strictly positive.
    #[error("Invalid tick increment: {0} (must be > 0)")]
    NonPositiveTickIncrement(Decimal),

    /// The threshold search step must be strictly positive.
    #[error("Invalid threshold step: {0} (must be > 0)")]
    NonPositiveStep(Decimal),

    /// The target bar count must be at least one.
    #[error("Target bar count must be at least 1")]
    ZeroTarget,
}
