//! Day-file naming.
//!
//! Daily tick files carry their trading date in the file stem as
//! `YYYYMMDD`, e.g. `20240115.csv`.

use std::path::Path;

use chrono::NaiveDate;

/// Date layout embedded in day-file stems.
pub const DAY_STEM_FORMAT: &str = "%Y%m%d";

/// Extracts the trading date from a day-file path.
///
/// Returns `None` when the stem is not exactly eight digits forming a valid
/// calendar date.
#[must_use]
pub fn day_from_file_name(path: &Path) -> Option<NaiveDate> {
    let stem = path.file_stem()?.to_str()?;
    if stem.len() != 8 || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(stem, DAY_STEM_FORMAT).ok()
}

/// Builds the canonical file name for a trading day.
#[must_use]
pub fn day_file_name(date: NaiveDate, extension: &str) -> String {
    format!("{}.{extension}", date.format(DAY_STEM_FORMAT))
}
