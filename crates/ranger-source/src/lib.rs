//! Tick file discovery and readers for the ranger toolkit.
//!
//! This crate provides the input side of the pipeline:
//!
//! - [`scan_day_files`] - Finds dated tick files in a directory
//! - [`read_ticks`] - Reads a CSV, ZIP-compressed CSV or Parquet tick file
//! - [`day_stream`] - Ordered, concurrent day-by-day reading
//! - [`read_bar_archive`] - Loads a previously written bar archive

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ranger/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod archive;
mod csv;
mod discover;
mod reader;
mod stream;
mod zipped;

#[cfg(feature = "parquet")]
mod parquet;

pub use crate::csv::{parse_csv_ticks, read_csv_ticks};
pub use archive::{BarArchive, parse_bar_archive, read_bar_archive};
pub use discover::{DayFile, DayFileScan, TickFileKind, scan_day_files};
pub use reader::{TickBatch, read_ticks};
pub use stream::{DEFAULT_CONCURRENCY, DayBatch, day_stream};
pub use zipped::{ZipEntry, is_zip_path, read_zip_entry, read_zip_ticks, unzip_entry};

#[cfg(feature = "parquet")]
pub use crate::parquet::read_parquet_ticks;
