//! Apache Parquet output format.

use std::io::Write;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, TimestampMicrosecondArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use ranger_aggregate::RangeBar;
use ranger_types::Tick;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::{BAR_HEADER, FormatError, Formatter, TICK_HEADER};

/// Parquet formatter.
///
/// Timestamps are stored as microseconds in UTC; prices, volumes and
/// thresholds as `Float64`.
#[derive(Debug, Clone)]
pub struct ParquetFormatter {
    /// Row group size (number of rows per group).
    row_group_size: usize,
    /// Compression codec.
    compression: Compression,
}

impl Default for ParquetFormatter {
    fn default() -> Self {
        Self {
            row_group_size: 100_000,
            compression: Compression::SNAPPY,
        }
    }
}

impl ParquetFormatter {
    /// Creates a new Parquet formatter with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the row group size.
    #[must_use]
    pub const fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Sets the compression codec.
    #[must_use]
    pub const fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Builds a schema of one UTC timestamp column followed by `Float64`
    /// value columns.
    fn schema(columns: &[&str]) -> SchemaRef {
        let mut fields = vec![Field::new(
            columns[0],
            DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
            false,
        )];
        fields.extend(
            columns[1..]
                .iter()
                .map(|name| Field::new(*name, DataType::Float64, false)),
        );
        Arc::new(Schema::new(fields))
    }

    fn write_rows<T, W: Write + Send>(
        &self,
        schema: SchemaRef,
        rows: &[T],
        writer: W,
        to_batch: impl Fn(SchemaRef, &[T]) -> Result<RecordBatch, FormatError>,
    ) -> Result<(), FormatError> {
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut arrow_writer =
            ArrowWriter::try_new(writer, schema.clone(), Some(props)).map_err(parquet_error)?;

        for chunk in rows.chunks(self.row_group_size.max(1)) {
            let batch = to_batch(schema.clone(), chunk)?;
            arrow_writer.write(&batch).map_err(parquet_error)?;
        }

        arrow_writer.close().map_err(parquet_error)?;
        Ok(())
    }
}

fn timestamps(values: impl Iterator<Item = i64>) -> ArrayRef {
    Arc::new(TimestampMicrosecondArray::from_iter_values(values).with_timezone("UTC"))
}

fn floats(values: impl Iterator<Item = Decimal>) -> ArrayRef {
    Arc::new(Float64Array::from_iter_values(
        values.map(|value| value.to_f64().unwrap_or(f64::NAN)),
    ))
}

fn bars_to_batch(schema: SchemaRef, bars: &[RangeBar]) -> Result<RecordBatch, FormatError> {
    RecordBatch::try_new(
        schema,
        vec![
            timestamps(bars.iter().map(|b| b.open_time.timestamp_micros())),
            floats(bars.iter().map(|b| b.open)),
            floats(bars.iter().map(|b| b.high)),
            floats(bars.iter().map(|b| b.low)),
            floats(bars.iter().map(|b| b.close)),
            floats(bars.iter().map(|b| b.volume)),
            floats(bars.iter().map(|b| b.threshold)),
        ],
    )
    .map_err(parquet_error)
}

fn ticks_to_batch(schema: SchemaRef, ticks: &[Tick]) -> Result<RecordBatch, FormatError> {
    RecordBatch::try_new(
        schema,
        vec![
            timestamps(ticks.iter().map(|t| t.timestamp.timestamp_micros())),
            floats(ticks.iter().map(|t| t.price)),
            floats(ticks.iter().map(|t| t.volume)),
        ],
    )
    .map_err(parquet_error)
}

fn parquet_error(e: impl std::fmt::Display) -> FormatError {
    FormatError::Parquet(e.to_string())
}

impl Formatter for ParquetFormatter {
    fn write_bars<W: Write + Send>(
        &self,
        bars: &[RangeBar],
        writer: W,
    ) -> Result<(), FormatError> {
        self.write_rows(Self::schema(&BAR_HEADER), bars, writer, bars_to_batch)
    }

    fn write_ticks<W: Write + Send>(&self, ticks: &[Tick], writer: W) -> Result<(), FormatError> {
        self.write_rows(Self::schema(&TICK_HEADER), ticks, writer, ticks_to_batch)
    }

    fn extension(&self) -> &str {
        "parquet"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::AsArray;
    use arrow::datatypes::Float64Type;
    use chrono::{TimeZone, Utc};
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use std::io::Cursor;

    fn create_test_bars(n: i64) -> Vec<RangeBar> {
        let open_time = Utc.with_ymd_and_hms(2024, 1, 15, 12, 30, 45).unwrap();
        (0..n)
            .map(|i| {
                RangeBar::new(
                    open_time,
                    Decimal::from(100 + i),
                    Decimal::from(110 + i),
                    Decimal::from(100 + i),
                    Decimal::from(110 + i),
                    Decimal::from_str_exact("2.5").unwrap(),
                    Decimal::from(10),
                )
            })
            .collect()
    }

    #[test]
    fn test_parquet_magic() {
        let mut output = Cursor::new(Vec::new());
        ParquetFormatter::new()
            .write_bars(&create_test_bars(1), &mut output)
            .unwrap();

        // Parquet files start with "PAR1" magic bytes
        let data = output.into_inner();
        assert!(data.len() > 4);
        assert_eq!(&data[0..4], b"PAR1");
    }

    #[test]
    fn test_schemas() {
        let bars = ParquetFormatter::schema(&BAR_HEADER);
        assert_eq!(bars.fields().len(), 7);
        assert!(bars.field_with_name("datetime").is_ok());
        assert!(bars.field_with_name("size").is_ok());

        let ticks = ParquetFormatter::schema(&TICK_HEADER);
        assert_eq!(ticks.fields().len(), 3);
        assert!(ticks.field_with_name("last").is_ok());
    }

    #[test]
    fn test_bars_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bars.parquet");
        let file = std::fs::File::create(&path).unwrap();
        ParquetFormatter::new()
            .with_row_group_size(2)
            .write_bars(&create_test_bars(5), file)
            .unwrap();

        let reader = ParquetRecordBatchReaderBuilder::try_new(std::fs::File::open(&path).unwrap())
            .unwrap()
            .build()
            .unwrap();
        let batches: Vec<_> = reader.map(Result::unwrap).collect();
        let rows: usize = batches.iter().map(RecordBatch::num_rows).sum();
        assert_eq!(rows, 5);

        let volume = batches[0]
            .column_by_name("volume")
            .unwrap()
            .as_primitive::<Float64Type>()
            .value(0);
        assert!((volume - 2.5).abs() < f64::EPSILON);
    }
}
