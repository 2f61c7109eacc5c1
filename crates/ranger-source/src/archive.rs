//! Range-bar archive reader.

use std::path::Path;

use chrono::NaiveDate;
use futures::StreamExt;
use ranger_aggregate::RangeBar;
use ranger_types::{Decimal, RangerError, Result, parse_timestamp};
use serde::Deserialize;
use tokio::io::AsyncRead;
use tracing::debug;

use crate::csv::csv_error;
use crate::zipped::{is_zip_path, read_zip_entry};

/// One archive row as written by the CSV bar formatter.
#[derive(Debug, Deserialize)]
struct ArchiveRow {
    datetime: String,
    open: Decimal,
    high: Decimal,
    low: Decimal,
    close: Decimal,
    #[serde(alias = "vol")]
    volume: Decimal,
    size: Decimal,
}

/// A range-bar archive loaded into memory.
///
/// Bars may carry different thresholds when the archive was extended with
/// adaptive selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BarArchive {
    bars: Vec<RangeBar>,
}

impl BarArchive {
    /// Wraps an ordered bar sequence.
    #[must_use]
    pub const fn new(bars: Vec<RangeBar>) -> Self {
        Self { bars }
    }

    /// Returns the bars in file order.
    #[must_use]
    pub fn bars(&self) -> &[RangeBar] {
        &self.bars
    }

    /// Consumes the archive, returning its bars.
    #[must_use]
    pub fn into_bars(self) -> Vec<RangeBar> {
        self.bars
    }

    /// Returns the number of bars.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bars.len()
    }

    /// Returns true if the archive holds no bars.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Returns the threshold of the final bar.
    #[must_use]
    pub fn last_threshold(&self) -> Option<Decimal> {
        self.bars.last().map(|bar| bar.threshold)
    }

    /// Returns the latest trading date present in the archive.
    ///
    /// This is the maximum over all bars, not the date of the final row.
    #[must_use]
    pub fn last_day(&self) -> Option<NaiveDate> {
        self.bars.iter().map(RangeBar::day).max()
    }

    /// Iterates the bars that opened on `day`.
    pub fn bars_on(&self, day: NaiveDate) -> impl Iterator<Item = &RangeBar> + '_ {
        self.bars.iter().filter(move |bar| bar.day() == day)
    }

    /// Returns the summed volume of all bars.
    #[must_use]
    pub fn total_volume(&self) -> Decimal {
        self.bars.iter().map(|bar| bar.volume).sum()
    }
}

/// Parses a CSV bar archive with header
/// `datetime,open,high,low,close,volume,size`.
///
/// # Errors
///
/// Returns [`RangerError::Parse`] naming the line of the first malformed row,
/// or [`RangerError::MissingColumn`] if the header is incomplete.
pub async fn parse_bar_archive<R>(reader: R) -> Result<BarArchive>
where
    R: AsyncRead + Unpin + Send,
{
    let mut reader = csv_async::AsyncReaderBuilder::new()
        .trim(csv_async::Trim::All)
        .create_deserializer(reader);

    let headers = reader.headers().await.map_err(csv_error)?;
    for name in ["datetime", "open", "high", "low", "close", "size"] {
        if !headers.iter().any(|header| header == name) {
            return Err(RangerError::MissingColumn(name.to_string()));
        }
    }

    let mut bars = Vec::new();
    let mut rows = reader.deserialize::<ArchiveRow>();
    let mut line = 1;
    while let Some(row) = rows.next().await {
        line += 1;
        let row = row.map_err(|e| RangerError::Parse(format!("archive line {line}: {e}")))?;
        let open_time = parse_timestamp(&row.datetime).ok_or_else(|| {
            RangerError::Parse(format!(
                "archive line {line}: invalid datetime {:?}",
                row.datetime
            ))
        })?;
        bars.push(RangeBar::new(
            open_time, row.open, row.high, row.low, row.close, row.volume, row.size,
        ));
    }
    Ok(BarArchive::new(bars))
}

/// Reads a bar archive from disk, either plain CSV or a ZIP holding one CSV.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a row is malformed.
pub async fn read_bar_archive(path: impl AsRef<Path>) -> Result<BarArchive> {
    let path = path.as_ref();
    let archive = if is_zip_path(path) {
        let entry = read_zip_entry(path).await?;
        parse_bar_archive(entry.data.as_slice()).await?
    } else {
        let file = tokio::fs::File::open(path).await?;
        parse_bar_archive(file).await?
    };
    debug!(
        path = %path.display(),
        bars = archive.len(),
        last_day = ?archive.last_day(),
        "read bar archive"
    );
    Ok(archive)
}
