//! Format dispatch for tick files.

use std::path::Path;

use ranger_types::{RangerError, Result, Tick};

use crate::TickFileKind;
use crate::csv::read_csv_ticks;
#[cfg(feature = "parquet")]
use crate::parquet::read_parquet_ticks;
use crate::zipped::read_zip_ticks;

/// Ticks read from one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickBatch {
    /// Ticks in file order.
    pub ticks: Vec<Tick>,
    /// Rows dropped because a field was missing or unparseable.
    pub skipped_rows: usize,
}

impl TickBatch {
    /// Creates a new tick batch.
    #[must_use]
    pub const fn new(ticks: Vec<Tick>, skipped_rows: usize) -> Self {
        Self {
            ticks,
            skipped_rows,
        }
    }

    /// Returns true if the batch is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// Returns the number of ticks in the batch.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.ticks.len()
    }
}

/// Reads a tick file, choosing the reader from its extension.
///
/// # Errors
///
/// Returns [`RangerError::UnsupportedFile`] for unknown extensions (and for
/// Parquet files when built without the `parquet` feature), or any error
/// from the underlying reader.
pub async fn read_ticks(path: impl AsRef<Path>) -> Result<TickBatch> {
    let path = path.as_ref();
    match TickFileKind::from_path(path) {
        Some(TickFileKind::Csv) => read_csv_ticks(path).await,
        Some(TickFileKind::Zip) => read_zip_ticks(path).await,
        #[cfg(feature = "parquet")]
        Some(TickFileKind::Parquet) => read_parquet_ticks(path).await,
        _ => Err(RangerError::UnsupportedFile(path.display().to_string())),
    }
}
