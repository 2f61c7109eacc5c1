//! Shared options, output writers and run summaries for the ranger CLI.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
#[cfg(not(feature = "parquet"))]
use anyhow::bail;
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use ranger_lib::prelude::*;
use ranger_lib::{FormatError, infer_tick_size, is_zip_path, read_zip_entry, write_zip_entry};
use tracing::{debug, warn};

/// Output format for bars and ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    Csv,
    Json,
    Ndjson,
    Parquet,
    Zip,
}

impl Format {
    /// Returns the file extension for this format.
    pub(crate) const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Ndjson => "ndjson",
            Self::Parquet => "parquet",
            Self::Zip => "zip",
        }
    }

    /// Uses the explicit choice, else the output extension, else CSV.
    pub(crate) fn resolve(explicit: Option<Self>, output: &Path) -> Self {
        explicit
            .or_else(|| OutputFormat::from_path(output).map(Self::from))
            .unwrap_or(Self::Csv)
    }
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Csv => Self::Csv,
            OutputFormat::Json => Self::Json,
            OutputFormat::Ndjson => Self::Ndjson,
            OutputFormat::Parquet => Self::Parquet,
            OutputFormat::Zip => Self::Zip,
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Gap options shared by the bar-building commands.
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct GapArgs {
    /// Open each bar one tick past the previous close
    #[arg(long)]
    pub(crate) gap: bool,

    /// Instrument tick size used for gaps (--gap needs this or --infer-tick-size)
    #[arg(long, requires = "gap", conflicts_with = "infer_tick_size")]
    pub(crate) tick_size: Option<Decimal>,

    /// Use each day's smallest price change as the tick size
    #[arg(long, requires = "gap")]
    pub(crate) infer_tick_size: bool,
}

impl GapArgs {
    /// Builds the aggregation settings for `threshold`.
    ///
    /// With `--infer-tick-size` the gap is left off here and resolved per
    /// day by [`Self::for_day`].
    pub(crate) fn config(&self, threshold: Decimal) -> Result<RangeBarConfig> {
        let config = if self.infer_tick_size {
            RangeBarConfig::new(threshold)
        } else {
            RangeBarConfig::from_options(threshold, self.gap, self.tick_size)
        };
        config.context("Invalid range bar settings")
    }

    /// Returns `config` with the gap resolved for one day's ticks.
    ///
    /// A day without any price change keeps `config` unchanged; no bar can
    /// close on such a day, so the gap would never apply.
    pub(crate) fn for_day(&self, config: RangeBarConfig, ticks: &[Tick]) -> Result<RangeBarConfig> {
        if !self.infer_tick_size {
            return Ok(config);
        }
        let Some(increment) = infer_tick_size(ticks) else {
            debug!("no price change to infer a tick size from");
            return Ok(config);
        };
        debug!(%increment, "inferred tick size");
        config
            .with_gap(GapPolicy::OneTick { increment })
            .context("Invalid inferred tick size")
    }
}

/// Rows handed to a formatter.
#[derive(Clone, Copy)]
enum Rows<'a> {
    Bars(&'a [RangeBar]),
    Ticks(&'a [Tick]),
}

fn write_rows<F: Formatter>(
    formatter: &F,
    rows: Rows<'_>,
    writer: impl Write + Send,
) -> Result<(), FormatError> {
    match rows {
        Rows::Bars(bars) => formatter.write_bars(bars, writer),
        Rows::Ticks(ticks) => formatter.write_ticks(ticks, writer),
    }
}

fn write_output(rows: Rows<'_>, output: &Path, format: Format) -> Result<()> {
    let file = File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let writer = BufWriter::new(file);

    match format {
        Format::Csv => write_rows(&CsvFormatter::new(), rows, writer)?,
        Format::Json => write_rows(&JsonFormatter::new(), rows, writer)?,
        Format::Ndjson => write_rows(&JsonFormatter::ndjson(), rows, writer)?,
        Format::Parquet => {
            #[cfg(feature = "parquet")]
            write_rows(&ParquetFormatter::new(), rows, writer)?;
            #[cfg(not(feature = "parquet"))]
            bail!("Parquet support not compiled in");
        }
        Format::Zip => write_rows(&ZipFormatter::csv_for(output), rows, writer)?,
    }

    Ok(())
}

/// Write range bars to a file in the specified format.
pub(crate) fn write_bars(bars: &[RangeBar], output: &Path, format: Format) -> Result<()> {
    write_output(Rows::Bars(bars), output, format)
}

/// Write ticks to a file in the specified format.
pub(crate) fn write_ticks(ticks: &[Tick], output: &Path, format: Format) -> Result<()> {
    write_output(Rows::Ticks(ticks), output, format)
}

/// Appends bars to an archive without repeating the header.
///
/// Plain CSV archives are appended in place. A zipped archive is inflated,
/// extended and rewritten through a temporary file next to it.
pub(crate) async fn append_bars(bars: &[RangeBar], archive: &Path) -> Result<()> {
    if is_zip_path(archive) {
        return append_zipped_bars(bars, archive).await;
    }

    let needs_newline = !ends_with_newline(archive)?;
    let file = OpenOptions::new()
        .append(true)
        .open(archive)
        .with_context(|| format!("Failed to open {} for appending", archive.display()))?;
    let mut writer = BufWriter::new(file);

    if needs_newline {
        writeln!(writer)?;
    }
    CsvFormatter::new()
        .with_header(false)
        .write_bars(bars, writer)?;
    Ok(())
}

async fn append_zipped_bars(bars: &[RangeBar], archive: &Path) -> Result<()> {
    let mut entry = read_zip_entry(archive)
        .await
        .with_context(|| format!("Failed to read {}", archive.display()))?;

    if entry.data.last().is_some_and(|&byte| byte != b'\n') {
        entry.data.push(b'\n');
    }
    CsvFormatter::new()
        .with_header(false)
        .write_bars(bars, &mut entry.data)?;

    let mut staging = archive.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);
    let file = File::create(&staging)
        .with_context(|| format!("Failed to create {}", staging.display()))?;
    write_zip_entry(&entry.name, &entry.data, BufWriter::new(file))?;
    std::fs::rename(&staging, archive)
        .with_context(|| format!("Failed to replace {}", archive.display()))?;
    Ok(())
}

fn ends_with_newline(path: &Path) -> Result<bool> {
    let mut file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

/// Creates a progress bar over `len` items, hidden in quiet mode.
pub(crate) fn progress_bar(len: u64, quiet: bool, unit: &str) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let template = format!(
        "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {unit} ({{percent}}%) {{msg}}"
    );
    let style = ProgressStyle::default_bar()
        .template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-");
    let pb = ProgressBar::new(len);
    pb.set_style(style);
    pb
}

/// Outcome counters for a multi-day run.
#[derive(Debug, Default)]
pub(crate) struct RunSummary {
    /// Days aggregated.
    pub(crate) days: usize,
    /// Day files that could not be read.
    pub(crate) failed_days: usize,
    /// Days rejected for out-of-order timestamps.
    pub(crate) unsorted_days: usize,
    /// Tick files skipped for not carrying a date in their name.
    pub(crate) skipped_files: usize,
    /// Malformed tick rows dropped.
    pub(crate) skipped_rows: usize,
    /// Bars produced.
    pub(crate) bars: usize,
    /// Volume of the bars produced.
    pub(crate) volume: Decimal,
}

impl RunSummary {
    /// Creates a summary, recording files skipped during discovery.
    pub(crate) fn new(skipped_files: usize) -> Self {
        Self {
            skipped_files,
            ..Self::default()
        }
    }

    /// Aggregates one day and records the outcome.
    ///
    /// Returns `None` when the day has to be skipped.
    pub(crate) fn aggregate_day(
        &mut self,
        day: &DayBatch,
        config: &RangeBarConfig,
    ) -> Option<Vec<RangeBar>> {
        if day.had_error() {
            self.failed_days += 1;
            return None;
        }
        self.skipped_rows += day.skipped_rows;

        match aggregate(&day.ticks, config) {
            Ok(bars) => {
                self.days += 1;
                self.bars += bars.len();
                self.volume += bars.iter().map(|bar| bar.volume).sum::<Decimal>();
                Some(bars)
            }
            Err(e) => {
                warn!(date = %day.date(), error = %e, "skipping day with out-of-order ticks");
                self.unsorted_days += 1;
                None
            }
        }
    }

    /// Returns the number of days that produced no bars because of an error.
    pub(crate) const fn skipped_days(&self) -> usize {
        self.failed_days + self.unsorted_days
    }

    /// Prints the summary to stdout.
    pub(crate) fn print(&self) {
        println!("Days processed: {}", self.days);
        if self.skipped_days() > 0 {
            println!(
                "Days skipped:   {} ({} unreadable, {} out of order)",
                self.skipped_days(),
                self.failed_days,
                self.unsorted_days
            );
        }
        if self.skipped_files > 0 {
            println!("Files ignored:  {} (name is not YYYYMMDD)", self.skipped_files);
        }
        if self.skipped_rows > 0 {
            println!("Rows skipped:   {}", self.skipped_rows);
        }
        println!("Bars written:   {}", self.bars);
        println!("Total volume:   {}", self.volume);
    }
}
