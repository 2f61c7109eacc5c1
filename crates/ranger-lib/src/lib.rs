//! Range-bar construction from trade ticks.
//!
//! This is a facade crate that re-exports functionality from the ranger
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use ranger_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let scan = scan_day_files("ticks").await?;
//!     let Some(day) = scan.earliest() else { return Ok(()) };
//!
//!     let batch = read_ticks(&day.path).await?;
//!     let config = RangeBarConfig::new(Decimal::from(300))?;
//!     let bars = dedupe_timestamps(aggregate(&batch.ticks, &config)?);
//!
//!     CsvFormatter::new().write_bars(&bars, std::io::stdout())?;
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ranger/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use ranger_types::*;

// Re-export aggregation
pub use ranger_aggregate::{
    AggregateError, Breakout, GapPolicy, RangeBar, RangeBarAggregator, RangeBarConfig,
    Timestamped, TimestampDeduplicator, aggregate, count_bars, dedupe_timestamps,
    infer_tick_size,
};

// Re-export threshold selection
#[cfg(feature = "tune")]
pub use ranger_tune::{
    DEFAULT_STEP, DEFAULT_TARGET_BARS, ProbeResult, SearchStrategy, ThresholdSelector,
    TuneConfig, TuneError, select_threshold,
};

// Re-export tick sources
#[cfg(feature = "source")]
pub use ranger_source::{
    BarArchive, DEFAULT_CONCURRENCY, DayBatch, DayFile, DayFileScan, TickBatch, TickFileKind,
    ZipEntry, day_stream, is_zip_path, parse_bar_archive, parse_csv_ticks, read_bar_archive,
    read_csv_ticks, read_ticks, read_zip_entry, read_zip_ticks, scan_day_files, unzip_entry,
};

#[cfg(all(feature = "source", feature = "parquet"))]
pub use ranger_source::read_parquet_ticks;

// Re-export formatters
#[cfg(feature = "format")]
pub use ranger_format::{
    BAR_HEADER, CsvFormatter, FormatError, Formatter, JsonFormatter, JsonStyle, OutputFormat,
    TICK_HEADER, ZipFormatter, entry_name_for, write_zip_entry,
};

#[cfg(all(feature = "format", feature = "parquet"))]
pub use ranger_format::ParquetFormatter;

/// Prelude module for convenient imports.
///
/// ```
/// use ranger_lib::prelude::*;
/// ```
pub mod prelude {
    pub use ranger_types::{ConfigError, Decimal, RangerError, Result, Tick};

    pub use ranger_aggregate::{
        GapPolicy, RangeBar, RangeBarAggregator, RangeBarConfig, aggregate, dedupe_timestamps,
    };

    #[cfg(feature = "tune")]
    pub use ranger_tune::{SearchStrategy, ThresholdSelector, TuneConfig};

    #[cfg(feature = "source")]
    pub use ranger_source::{
        BarArchive, DayBatch, DayFile, TickBatch, day_stream, read_bar_archive, read_ticks,
        scan_day_files,
    };

    #[cfg(feature = "format")]
    pub use ranger_format::{CsvFormatter, Formatter, JsonFormatter, OutputFormat, ZipFormatter};

    #[cfg(all(feature = "format", feature = "parquet"))]
    pub use ranger_format::ParquetFormatter;
}
