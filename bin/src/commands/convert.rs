//! Convert command implementation.
//!
//! Builds a fixed-threshold bar archive from the earliest day file, or from
//! every day file with `--all`.

use std::path::PathBuf;
use std::pin::pin;

use anyhow::{Context, Result, bail};
use clap::Args;
use futures::StreamExt;
use ranger_lib::DEFAULT_CONCURRENCY;
use ranger_lib::prelude::*;
use tracing::info;

use crate::display::{Format, GapArgs, RunSummary, progress_bar, write_bars};

/// Arguments for `ranger convert`.
#[derive(Debug, Args)]
pub(crate) struct ConvertArgs {
    /// Directory of YYYYMMDD day files
    pub(crate) tick_dir: PathBuf,

    /// Output file
    #[arg(short, long)]
    pub(crate) output: PathBuf,

    /// Bar range threshold in price units
    #[arg(short, long, default_value = "300")]
    pub(crate) threshold: Decimal,

    #[command(flatten)]
    pub(crate) gap: GapArgs,

    /// Convert every day file instead of only the earliest
    #[arg(long)]
    pub(crate) all: bool,

    /// Output format (inferred from the output extension when omitted)
    #[arg(short, long, value_enum)]
    pub(crate) format: Option<Format>,

    /// Overwrite an existing output file
    #[arg(long)]
    pub(crate) force: bool,

    /// Day files read concurrently
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub(crate) concurrency: usize,
}

/// Convert day files into a bar archive.
pub(crate) async fn convert(args: ConvertArgs, quiet: bool) -> Result<()> {
    if args.output.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            args.output.display()
        );
    }

    let config = args.gap.config(args.threshold)?;
    let format = Format::resolve(args.format, &args.output);

    let scan = scan_day_files(&args.tick_dir)
        .await
        .with_context(|| format!("Failed to scan {}", args.tick_dir.display()))?;
    let files: Vec<DayFile> = if args.all {
        scan.files.clone()
    } else {
        scan.earliest().cloned().into_iter().collect()
    };
    if files.is_empty() {
        bail!("No day files found in {}", args.tick_dir.display());
    }
    info!(days = files.len(), threshold = %config.threshold(), "converting");

    let progress = progress_bar(files.len() as u64, quiet, "days");
    let mut summary = RunSummary::new(scan.skipped.len());
    let mut bars = Vec::new();

    let mut days = pin!(day_stream(files, args.concurrency));
    while let Some(day) = days.next().await {
        progress.set_message(day.date().to_string());
        let day_config = args.gap.for_day(config, &day.ticks)?;
        if let Some(day_bars) = summary.aggregate_day(&day, &day_config) {
            bars.extend(day_bars);
        }
        progress.inc(1);
    }
    progress.finish_with_message(format!("{} bars", bars.len()));

    let bars = dedupe_timestamps(bars);
    write_bars(&bars, &args.output, format)?;

    if !quiet {
        summary.print();
        println!("Output written to: {}", args.output.display());
    }

    Ok(())
}
