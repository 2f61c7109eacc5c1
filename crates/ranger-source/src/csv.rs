//! CSV tick reader.

use std::path::Path;

use csv_async::{AsyncReaderBuilder, StringRecord, Trim};
use futures::StreamExt;
use ranger_types::{Decimal, RangerError, Result, Tick, parse_timestamp};
use serde::Deserialize;
use tokio::io::AsyncRead;
use tracing::{debug, warn};

use crate::TickBatch;

const TIME_COLUMNS: &[&str] = &["datetime"];
const PRICE_COLUMNS: &[&str] = &["last", "<LAST>"];
const VOLUME_COLUMNS: &[&str] = &["volume", "<VOL>"];

/// One CSV row, in either the plain or the `<LAST>`/`<VOL>` export layout.
#[derive(Debug, Deserialize)]
struct TickRow {
    datetime: String,
    #[serde(alias = "<LAST>")]
    last: Decimal,
    #[serde(alias = "<VOL>")]
    volume: Decimal,
}

impl TickRow {
    fn into_tick(self) -> Option<Tick> {
        let timestamp = parse_timestamp(&self.datetime)?;
        Some(Tick::new(timestamp, self.last, self.volume))
    }
}

/// Reads ticks from CSV data with a header row.
///
/// Rows with a missing or unparseable field are skipped and counted.
///
/// # Errors
///
/// Returns an error if the header lacks a timestamp, price or volume column.
pub async fn parse_csv_ticks<R>(reader: R) -> Result<TickBatch>
where
    R: AsyncRead + Unpin + Send,
{
    let mut reader = AsyncReaderBuilder::new()
        .trim(Trim::All)
        .create_deserializer(reader);

    let headers = reader.headers().await.map_err(csv_error)?;
    for names in [TIME_COLUMNS, PRICE_COLUMNS, VOLUME_COLUMNS] {
        require_column(headers, names)?;
    }

    let mut batch = TickBatch::default();
    let mut rows = reader.deserialize::<TickRow>();
    while let Some(row) = rows.next().await {
        match row.ok().and_then(TickRow::into_tick) {
            Some(tick) => batch.ticks.push(tick),
            None => batch.skipped_rows += 1,
        }
    }
    Ok(batch)
}

/// Reads ticks from a CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or lacks a required column.
pub async fn read_csv_ticks(path: impl AsRef<Path>) -> Result<TickBatch> {
    let path = path.as_ref();
    let file = tokio::fs::File::open(path).await?;
    let batch = parse_csv_ticks(file).await?;

    if batch.skipped_rows > 0 {
        warn!(
            path = %path.display(),
            skipped = batch.skipped_rows,
            "skipped malformed tick rows"
        );
    }
    debug!(path = %path.display(), ticks = batch.len(), "read csv ticks");
    Ok(batch)
}

fn require_column(headers: &StringRecord, names: &[&str]) -> Result<()> {
    if headers.iter().any(|header| names.contains(&header)) {
        Ok(())
    } else {
        Err(RangerError::MissingColumn(names.join(" or ")))
    }
}

pub(crate) fn csv_error(e: csv_async::Error) -> RangerError {
    RangerError::Parse(e.to_string())
}
