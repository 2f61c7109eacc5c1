//! Output format abstraction.

use std::io::Write;
use std::path::Path;

use ranger_aggregate::RangeBar;
use ranger_types::Tick;
use thiserror::Error;

/// Output format identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// CSV format.
    #[default]
    Csv,
    /// JSON array format.
    Json,
    /// Newline-delimited JSON format.
    Ndjson,
    /// Apache Parquet format.
    Parquet,
    /// CSV compressed into a single-entry ZIP archive.
    Zip,
}

impl OutputFormat {
    /// Returns the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Ndjson => "ndjson",
            Self::Parquet => "parquet",
            Self::Zip => "zip",
        }
    }

    /// Returns all available formats.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Csv, Self::Json, Self::Ndjson, Self::Parquet, Self::Zip]
    }

    /// Infers the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()?.to_str()?.parse().ok()
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "ndjson" | "jsonl" => Ok(Self::Ndjson),
            "parquet" | "pq" => Ok(Self::Parquet),
            "zip" => Ok(Self::Zip),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}

/// Errors raised while writing bars or ticks.
#[derive(Error, Debug)]
pub enum FormatError {
    /// The requested format name is not a known output format.
    #[error("Unknown output format '{0}' (expected csv, json, ndjson, parquet or zip)")]
    UnknownFormat(String),

    /// Writing to the destination failed.
    #[error("Write failed: {0}")]
    Io(#[from] std::io::Error),

    /// A row could not be serialized to JSON.
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Arrow batch construction or Parquet encoding failed.
    #[error("Parquet encoding failed: {0}")]
    Parquet(String),

    /// ZIP compression failed.
    #[error("ZIP encoding failed: {0}")]
    Zip(String),
}

/// A destination encoding for bars and ticks.
///
/// Each call writes one complete document. CSV output carries a header
/// unless it was disabled for appending.
pub trait Formatter: Send + Sync {
    /// Writes range bars to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_bars<W: Write + Send>(&self, bars: &[RangeBar], writer: W)
    -> Result<(), FormatError>;

    /// Writes ticks to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_ticks<W: Write + Send>(&self, ticks: &[Tick], writer: W) -> Result<(), FormatError>;

    /// Returns the file extension written by this formatter.
    fn extension(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formats() {
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("jsonl".parse::<OutputFormat>().unwrap(), OutputFormat::Ndjson);
        assert_eq!("pq".parse::<OutputFormat>().unwrap(), OutputFormat::Parquet);
        assert_eq!("ZIP".parse::<OutputFormat>().unwrap(), OutputFormat::Zip);
        assert!(matches!(
            "xlsx".parse::<OutputFormat>(),
            Err(FormatError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            OutputFormat::from_path(Path::new("bars/range.parquet")),
            Some(OutputFormat::Parquet)
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("RTS_range.zip")),
            Some(OutputFormat::Zip)
        );
        assert_eq!(OutputFormat::from_path(Path::new("range.txt")), None);
        assert_eq!(OutputFormat::from_path(Path::new("range")), None);
    }

    #[test]
    fn test_display_round_trips() {
        for format in OutputFormat::all() {
            assert_eq!(format.to_string().parse::<OutputFormat>().unwrap(), *format);
        }
    }
}
