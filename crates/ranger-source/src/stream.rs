//! Ordered day-by-day tick reading.

use chrono::NaiveDate;
use futures::stream::{self, Stream, StreamExt};
use ranger_types::Tick;
use tracing::warn;

use crate::{DayFile, TickBatch, read_ticks};

/// Default number of day files read at once.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// The ticks of one day file.
#[derive(Debug, Clone)]
pub struct DayBatch {
    /// The file the ticks came from.
    pub file: DayFile,
    /// The ticks in file order.
    pub ticks: Vec<Tick>,
    /// Rows dropped as malformed.
    pub skipped_rows: usize,
    /// Why the file could not be read, if it could not.
    pub error: Option<String>,
}

impl DayBatch {
    /// Creates a batch from a successful read.
    #[must_use]
    pub fn new(file: DayFile, batch: TickBatch) -> Self {
        Self {
            file,
            ticks: batch.ticks,
            skipped_rows: batch.skipped_rows,
            error: None,
        }
    }

    /// Creates an empty batch for a file that failed to read.
    #[must_use]
    pub const fn failed(file: DayFile, error: String) -> Self {
        Self {
            file,
            ticks: Vec::new(),
            skipped_rows: 0,
            error: Some(error),
        }
    }

    /// Returns the trading date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.file.date
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

    /// Returns true if the file could not be read.
    #[must_use]
    pub const fn had_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Reads day files concurrently, yielding them in the order given.
///
/// Up to `concurrency` files are read at once. A file that fails to read is
/// yielded as an empty batch with [`DayBatch::error`] set; the stream itself
/// never fails.
pub fn day_stream(files: Vec<DayFile>, concurrency: usize) -> impl Stream<Item = DayBatch> {
    stream::iter(files)
        .map(|file| async move {
            match read_ticks(&file.path).await {
                Ok(batch) => DayBatch::new(file, batch),
                Err(e) => {
                    warn!(path = %file.path.display(), error = %e, "failed to read day file");
                    DayBatch::failed(file, e.to_string())
                }
            }
        })
        .buffered(concurrency.max(1))
}
