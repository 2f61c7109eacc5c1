//! ZIP-compressed output.

use std::io::{Cursor, Write};
use std::path::Path;

use ranger_aggregate::RangeBar;
use ranger_types::Tick;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::{CsvFormatter, FormatError, Formatter};

/// Wraps another formatter's output in a single-entry, deflated ZIP.
#[derive(Debug, Clone)]
pub struct ZipFormatter<F> {
    inner: F,
    entry_name: String,
}

impl ZipFormatter<CsvFormatter> {
    /// Creates a zipped CSV formatter whose entry is named after `path`,
    /// e.g. `RTS_range.zip` holds `RTS_range.csv`.
    #[must_use]
    pub fn csv_for(path: &Path) -> Self {
        Self::new(CsvFormatter::new(), entry_name_for(path, "csv"))
    }
}

impl<F: Formatter> ZipFormatter<F> {
    /// Creates a formatter writing `inner`'s output as entry `entry_name`.
    #[must_use]
    pub fn new(inner: F, entry_name: impl Into<String>) -> Self {
        Self {
            inner,
            entry_name: entry_name.into(),
        }
    }

    /// Returns the name of the archive entry.
    #[must_use]
    pub fn entry_name(&self) -> &str {
        &self.entry_name
    }
}

impl<F: Formatter> Formatter for ZipFormatter<F> {
    fn write_bars<W: Write + Send>(
        &self,
        bars: &[RangeBar],
        writer: W,
    ) -> Result<(), FormatError> {
        let mut data = Vec::new();
        self.inner.write_bars(bars, &mut data)?;
        write_zip_entry(&self.entry_name, &data, writer)
    }

    fn write_ticks<W: Write + Send>(&self, ticks: &[Tick], writer: W) -> Result<(), FormatError> {
        let mut data = Vec::new();
        self.inner.write_ticks(ticks, &mut data)?;
        write_zip_entry(&self.entry_name, &data, writer)
    }

    fn extension(&self) -> &str {
        "zip"
    }
}

/// Returns the entry name for an archive at `path`: its stem plus `extension`.
#[must_use]
pub fn entry_name_for(path: &Path, extension: &str) -> String {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or("data");
    format!("{stem}.{extension}")
}

/// Writes `data` as the only entry of a deflated ZIP archive.
///
/// # Errors
///
/// Returns an error if compression or writing fails.
pub fn write_zip_entry<W: Write>(
    entry_name: &str,
    data: &[u8],
    mut writer: W,
) -> Result<(), FormatError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file(entry_name, options).map_err(zip_error)?;
    zip.write_all(data)?;
    let archive = zip.finish().map_err(zip_error)?.into_inner();

    writer.write_all(&archive)?;
    writer.flush()?;
    Ok(())
}

fn zip_error(e: zip::result::ZipError) -> FormatError {
    FormatError::Zip(e.to_string())
}
