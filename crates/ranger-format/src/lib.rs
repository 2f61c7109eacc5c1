//! Output formatters for the ranger toolkit.
//!
//! This crate provides formatters for writing range bars and ticks
//! to various output formats:
//!
//! - [`CsvFormatter`] - CSV format, the bar archive layout
//! - [`JsonFormatter`] - JSON array or NDJSON format
//! - [`ParquetFormatter`] - Apache Parquet columnar format
//! - [`ZipFormatter`] - Any of the above inside a single-entry ZIP

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ranger/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod csv;
mod formatter;
mod json;
mod zipped;

#[cfg(feature = "parquet")]
mod parquet;

pub use crate::csv::{BAR_HEADER, CsvFormatter, TICK_HEADER};
pub use formatter::{FormatError, Formatter, OutputFormat};
pub use json::{JsonFormatter, JsonStyle};
pub use zipped::{ZipFormatter, entry_name_for, write_zip_entry};

#[cfg(feature = "parquet")]
pub use crate::parquet::ParquetFormatter;
