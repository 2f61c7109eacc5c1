//! Parquet tick reader.

use std::path::Path;
use std::str::FromStr;

use arrow::array::{Array, ArrayRef, AsArray, RecordBatch};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, TimeUnit, TimestampMicrosecondType};
use chrono::{DateTime, Utc};
use futures::StreamExt;
use parquet::arrow::ParquetRecordBatchStreamBuilder;
use ranger_types::{Decimal, RangerError, Result, Tick, parse_timestamp};
use tracing::{debug, warn};

use crate::TickBatch;

/// Reads ticks from a Parquet file.
///
/// The timestamp column may be any Arrow timestamp unit (timezone-aware
/// values are taken as UTC instants, naive values as UTC) or a string column
/// in one of the accepted text layouts. Price and volume may be any numeric
/// type. Rows with a null or unconvertible value are skipped and counted.
///
/// # Errors
///
/// Returns an error if the file cannot be read or lacks a required column.
pub async fn read_parquet_ticks(path: impl AsRef<Path>) -> Result<TickBatch> {
    let path = path.as_ref();
    let file = tokio::fs::File::open(path).await?;
    let mut stream = ParquetRecordBatchStreamBuilder::new(file)
        .await
        .map_err(parquet_error)?
        .build()
        .map_err(parquet_error)?;

    let mut batch = TickBatch::default();
    while let Some(record_batch) = stream.next().await {
        append_ticks(&record_batch.map_err(parquet_error)?, &mut batch)?;
    }

    if batch.skipped_rows > 0 {
        warn!(
            path = %path.display(),
            skipped = batch.skipped_rows,
            "skipped malformed tick rows"
        );
    }
    debug!(path = %path.display(), ticks = batch.len(), "read parquet ticks");
    Ok(batch)
}

fn append_ticks(record_batch: &RecordBatch, batch: &mut TickBatch) -> Result<()> {
    let timestamps = timestamp_values(column(record_batch, &["datetime"])?)?;
    let prices = decimal_values(column(record_batch, &["last", "<LAST>"])?)?;
    let volumes = decimal_values(column(record_batch, &["volume", "<VOL>"])?)?;

    for ((timestamp, price), volume) in timestamps.into_iter().zip(prices).zip(volumes) {
        match (timestamp, price, volume) {
            (Some(timestamp), Some(price), Some(volume)) => {
                batch.ticks.push(Tick::new(timestamp, price, volume));
            }
            _ => batch.skipped_rows += 1,
        }
    }
    Ok(())
}

fn column<'a>(record_batch: &'a RecordBatch, names: &[&str]) -> Result<&'a ArrayRef> {
    names
        .iter()
        .find_map(|name| record_batch.column_by_name(name))
        .ok_or_else(|| RangerError::MissingColumn(names.join(" or ")))
}

fn timestamp_values(array: &ArrayRef) -> Result<Vec<Option<DateTime<Utc>>>> {
    if matches!(
        array.data_type(),
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View
    ) {
        let strings = cast(array, &DataType::Utf8).map_err(parquet_error)?;
        return Ok(strings
            .as_string::<i32>()
            .iter()
            .map(|value| value.and_then(parse_timestamp))
            .collect());
    }

    let micros = cast(array, &DataType::Timestamp(TimeUnit::Microsecond, None))
        .map_err(parquet_error)?;
    Ok(micros
        .as_primitive::<TimestampMicrosecondType>()
        .iter()
        .map(|value| value.and_then(DateTime::from_timestamp_micros))
        .collect())
}

fn decimal_values(array: &ArrayRef) -> Result<Vec<Option<Decimal>>> {
    let floats = cast(array, &DataType::Float64).map_err(parquet_error)?;
    Ok(floats
        .as_primitive::<Float64Type>()
        .iter()
        .map(|value| value.and_then(decimal_from_f64))
        .collect())
}

/// Converts through the shortest round-trip rendering, so `0.1` stays `0.1`.
fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_str(&value.to_string()).ok()
}

fn parquet_error(e: impl std::fmt::Display) -> RangerError {
    RangerError::Parquet(e.to_string())
}
