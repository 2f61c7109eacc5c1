//! ZIP-compressed CSV files.
//!
//! Day files and bar archives are often stored as a ZIP holding a single
//! CSV entry. The entry is inflated in memory and handed to the CSV readers.

use std::io::{Cursor, Read};
use std::path::Path;

use ranger_types::{RangerError, Result};
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::TickBatch;
use crate::csv::parse_csv_ticks;

/// The inflated data entry of a ZIP file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipEntry {
    /// Entry name inside the archive, e.g. `range.csv`.
    pub name: String,
    /// Uncompressed contents.
    pub data: Vec<u8>,
}

/// Returns true if `path` has a `.zip` extension, ignoring case.
#[must_use]
pub fn is_zip_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

/// Extracts the data entry from ZIP bytes.
///
/// The first `.csv` entry wins; otherwise the first non-directory entry.
///
/// # Errors
///
/// Returns [`RangerError::Zip`] if the bytes are not a ZIP archive or it
/// holds no file entry.
pub fn unzip_entry(bytes: Vec<u8>) -> Result<ZipEntry> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(zip_error)?;

    let mut chosen = None;
    for index in 0..archive.len() {
        let entry = archive.by_index(index).map_err(zip_error)?;
        if entry.is_dir() {
            continue;
        }
        let is_csv = entry.name().to_ascii_lowercase().ends_with(".csv");
        if is_csv {
            chosen = Some(index);
            break;
        }
        if chosen.is_none() {
            chosen = Some(index);
        }
    }
    let index = chosen.ok_or_else(|| RangerError::Zip("archive holds no file entry".into()))?;

    let files = archive.len();
    let mut entry = archive.by_index(index).map_err(zip_error)?;
    if files > 1 {
        warn!(entry = entry.name(), files, "ZIP holds several entries; reading one");
    }
    let name = entry.name().to_string();
    let mut data = Vec::new();
    entry.read_to_end(&mut data)?;
    Ok(ZipEntry { name, data })
}

/// Reads and inflates the data entry of a ZIP file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a usable archive.
pub async fn read_zip_entry(path: impl AsRef<Path>) -> Result<ZipEntry> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    let entry = unzip_entry(bytes)?;
    debug!(
        path = %path.display(),
        entry = %entry.name,
        bytes = entry.data.len(),
        "inflated ZIP entry"
    );
    Ok(entry)
}

/// Reads ticks from a ZIP file holding one CSV.
///
/// # Errors
///
/// Returns an error if the archive is unusable or the CSV lacks a required
/// column.
pub async fn read_zip_ticks(path: impl AsRef<Path>) -> Result<TickBatch> {
    let path = path.as_ref();
    let entry = read_zip_entry(path).await?;
    let batch = parse_csv_ticks(entry.data.as_slice()).await?;

    if batch.skipped_rows > 0 {
        warn!(
            path = %path.display(),
            skipped = batch.skipped_rows,
            "skipped malformed tick rows"
        );
    }
    Ok(batch)
}

fn zip_error(e: zip::result::ZipError) -> RangerError {
    RangerError::Zip(e.to_string())
}
