//! Day-file discovery.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use ranger_types::{Result, day_from_file_name};
use tracing::{debug, warn};

/// Recognized tick file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickFileKind {
    /// Comma-separated values with a header row.
    Csv,
    /// Apache Parquet.
    Parquet,
    /// ZIP archive holding one CSV.
    Zip,
}

impl TickFileKind {
    /// Detects the format from a file extension, ignoring case.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "parquet" | "pq" => Some(Self::Parquet),
            "zip" => Some(Self::Zip),
            _ => None,
        }
    }

    /// Returns the canonical extension.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Parquet => "parquet",
            Self::Zip => "zip",
        }
    }
}

/// A tick file holding one trading day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayFile {
    /// Trading date parsed from the file stem.
    pub date: NaiveDate,
    /// Location of the file.
    pub path: PathBuf,
    /// File format.
    pub kind: TickFileKind,
}

impl DayFile {
    /// Builds a day file from a path, if its name and extension qualify.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let kind = TickFileKind::from_path(&path)?;
        let date = day_from_file_name(&path)?;
        Some(Self { date, path, kind })
    }
}

/// Result of scanning a directory for day files.
#[derive(Debug, Clone, Default)]
pub struct DayFileScan {
    /// Day files sorted by date.
    pub files: Vec<DayFile>,
    /// Tick files whose stem is not a valid `YYYYMMDD` date.
    pub skipped: Vec<PathBuf>,
}

impl DayFileScan {
    /// Returns the day file with the earliest date.
    #[must_use]
    pub fn earliest(&self) -> Option<&DayFile> {
        self.files.first()
    }

    /// Returns the day files dated strictly after `date`, in date order.
    pub fn after(&self, date: NaiveDate) -> impl Iterator<Item = &DayFile> + '_ {
        self.files.iter().filter(move |file| file.date > date)
    }

    /// Returns the number of day files found.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true if no day files were found.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Lists the day files in `dir`.
///
/// Only regular files with a recognized tick extension are considered; those
/// whose stem does not parse as a date are reported in
/// [`DayFileScan::skipped`]. Files sharing a date (e.g. `20240115.csv` and
/// `20240115.parquet`) are ordered by path.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub async fn scan_day_files(dir: impl AsRef<Path>) -> Result<DayFileScan> {
    let dir = dir.as_ref();
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut scan = DayFileScan::default();

    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let path = entry.path();
        if TickFileKind::from_path(&path).is_none() {
            continue;
        }
        match DayFile::from_path(path.clone()) {
            Some(file) => scan.files.push(file),
            None => {
                warn!(path = %path.display(), "skipping tick file without a YYYYMMDD name");
                scan.skipped.push(path);
            }
        }
    }

    scan.files
        .sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.path.cmp(&b.path)));
    scan.skipped.sort();
    debug!(
        dir = %dir.display(),
        files = scan.files.len(),
        skipped = scan.skipped.len(),
        "scanned tick directory"
    );
    Ok(scan)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_kind_from_path() {
        assert_eq!(
            TickFileKind::from_path(Path::new("20240101.csv")),
            Some(TickFileKind::Csv)
        );
        assert_eq!(
            TickFileKind::from_path(Path::new("20240101.CSV")),
            Some(TickFileKind::Csv)
        );
        assert_eq!(
            TickFileKind::from_path(Path::new("20240101.pq")),
            Some(TickFileKind::Parquet)
        );
        assert_eq!(
            TickFileKind::from_path(Path::new("20240101.ZIP")),
            Some(TickFileKind::Zip)
        );
        assert_eq!(TickFileKind::from_path(Path::new("20240101.7z")), None);
        assert_eq!(TickFileKind::from_path(Path::new("20240101")), None);
    }

    #[test]
    fn test_day_file_from_path() {
        let file = DayFile::from_path("/ticks/20240315.parquet").unwrap();
        assert_eq!(file.date, date(2024, 3, 15));
        assert_eq!(file.kind, TickFileKind::Parquet);
        assert!(DayFile::from_path("/ticks/march.parquet").is_none());
    }

    #[tokio::test]
    async fn test_scan_day_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "20240103.csv",
            "20240101.parquet",
            "20240102.CSV",
            "notes.txt",
            "2024013.csv",
            "20241340.csv",
        ] {
            std::fs::write(dir.path().join(name), "datetime,last,volume\n").unwrap();
        }
        std::fs::create_dir(dir.path().join("20240104.csv")).unwrap();

        let scan = scan_day_files(dir.path()).await.unwrap();

        let dates: Vec<_> = scan.files.iter().map(|f| f.date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]
        );
        assert_eq!(scan.skipped.len(), 2);
        assert_eq!(scan.earliest().unwrap().date, date(2024, 1, 1));

        let later: Vec<_> = scan.after(date(2024, 1, 1)).map(|f| f.date).collect();
        assert_eq!(later, vec![date(2024, 1, 2), date(2024, 1, 3)]);
        assert_eq!(scan.after(date(2024, 1, 3)).count(), 0);
    }

    #[tokio::test]
    async fn test_scan_zip_day_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["20240115.zip", "20240116.zip", "RTS_range.zip"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }

        let scan = scan_day_files(dir.path()).await.unwrap();

        assert_eq!(scan.files.len(), 2);
        assert!(scan.files.iter().all(|f| f.kind == TickFileKind::Zip));
        assert_eq!(scan.earliest().unwrap().date, date(2024, 1, 15));
        assert_eq!(scan.skipped, vec![dir.path().join("RTS_range.zip")]);
    }

    #[tokio::test]
    async fn test_scan_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_day_files(dir.path().join("absent")).await.is_err());
    }

    #[tokio::test]
    async fn test_scan_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let scan = scan_day_files(dir.path()).await.unwrap();
        assert!(scan.is_empty());
        assert!(scan.earliest().is_none());
    }
}
