//! Extend command implementation.
//!
//! Appends every day newer than an archive's last day, re-tuning the
//! threshold after each day so the next one lands near the target bar count.

use std::path::PathBuf;
use std::pin::pin;

use anyhow::{Context, Result, bail};
use clap::{Args, ValueEnum};
use futures::StreamExt;
use ranger_lib::prelude::*;
use ranger_lib::{DEFAULT_CONCURRENCY, DEFAULT_TARGET_BARS};
use tracing::{debug, info};

use crate::display::{GapArgs, RunSummary, append_bars, progress_bar};

/// Threshold search strategy selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Strategy {
    /// Previous threshold and one step either side
    Neighbors,
    /// Bounded bisection over multiples of the step
    Bisect,
}

/// Arguments for `ranger extend`.
#[derive(Debug, Args)]
pub(crate) struct ExtendArgs {
    /// Directory of YYYYMMDD day files
    pub(crate) tick_dir: PathBuf,

    /// CSV bar archive to extend
    #[arg(short, long)]
    pub(crate) archive: PathBuf,

    /// Desired number of bars per day
    #[arg(long, default_value_t = DEFAULT_TARGET_BARS)]
    pub(crate) target_bars: usize,

    /// Threshold adjustment step
    #[arg(long, default_value = "50")]
    pub(crate) step: Decimal,

    /// Threshold search strategy
    #[arg(long, value_enum, default_value = "neighbors")]
    pub(crate) strategy: Strategy,

    /// Probe budget for the bisect strategy
    #[arg(long, default_value_t = 8)]
    pub(crate) max_probes: u32,

    #[command(flatten)]
    pub(crate) gap: GapArgs,

    /// Day files read concurrently
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub(crate) concurrency: usize,
}

impl ExtendArgs {
    fn tune_config(&self) -> Result<TuneConfig> {
        let strategy = match self.strategy {
            Strategy::Neighbors => SearchStrategy::Neighbors,
            Strategy::Bisect => SearchStrategy::Bisect {
                max_probes: self.max_probes,
            },
        };
        Ok(TuneConfig::new(self.target_bars, self.step)
            .context("Invalid tuning settings")?
            .with_strategy(strategy))
    }
}

/// Append newer days to an archive.
pub(crate) async fn extend(args: ExtendArgs, quiet: bool) -> Result<()> {
    let selector = ThresholdSelector::new(args.tune_config()?);

    let archive = read_bar_archive(&args.archive)
        .await
        .with_context(|| format!("Failed to read archive {}", args.archive.display()))?;
    let (Some(mut threshold), Some(last_day)) = (archive.last_threshold(), archive.last_day())
    else {
        bail!(
            "{} has no bars; create it with `ranger convert` first",
            args.archive.display()
        );
    };
    let mut config = args.gap.config(threshold)?;

    let scan = scan_day_files(&args.tick_dir)
        .await
        .with_context(|| format!("Failed to scan {}", args.tick_dir.display()))?;
    let files: Vec<DayFile> = scan.after(last_day).cloned().collect();
    if files.is_empty() {
        if !quiet {
            println!("Archive is up to date (last day {last_day})");
        }
        return Ok(());
    }
    info!(days = files.len(), %last_day, %threshold, "extending archive");

    let progress = progress_bar(files.len() as u64, quiet, "days");
    let mut summary = RunSummary::new(scan.skipped.len());

    let mut days = pin!(day_stream(files, args.concurrency));
    while let Some(day) = days.next().await {
        progress.set_message(format!("{} @ {threshold}", day.date()));
        let day_config = args.gap.for_day(config, &day.ticks)?;
        let Some(bars) = summary.aggregate_day(&day, &day_config) else {
            progress.inc(1);
            continue;
        };

        let count = bars.len();
        append_bars(&dedupe_timestamps(bars), &args.archive)
            .await
            .with_context(|| format!("Failed to append {} to the archive", day.date()))?;

        if !day.is_empty() {
            // Gap mode bars differ from the plain probes, so only reuse the count without gaps.
            let known = (!day_config.gap().is_gapped()).then_some(count);
            let next = selector.select(&day.ticks, threshold, known)?;
            debug!(date = %day.date(), bars = count, from = %threshold, to = %next, "threshold updated");
            threshold = next;
            config = config.with_threshold(threshold)?;
        }
        progress.inc(1);
    }
    progress.finish_with_message(format!("{} bars added", summary.bars));

    if !quiet {
        summary.print();
        println!("Final threshold: {threshold}");
    }

    Ok(())
}
