//! Show command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use ranger_lib::format_bar_time;
use ranger_lib::prelude::*;

/// Arguments for `ranger show`.
#[derive(Debug, Args)]
pub(crate) struct ShowArgs {
    /// CSV bar archive
    pub(crate) archive: PathBuf,

    /// Number of trailing bars to print
    #[arg(short = 'n', long, default_value_t = 20)]
    pub(crate) tail: usize,
}

/// Print the last bars of an archive and a summary.
pub(crate) async fn show(args: ShowArgs) -> Result<()> {
    let archive = read_bar_archive(&args.archive)
        .await
        .with_context(|| format!("Failed to read archive {}", args.archive.display()))?;

    let bars = dedupe_timestamps(archive.bars().iter().copied());
    let start = bars.len().saturating_sub(args.tail);

    println!(
        "{:<28} {:>12} {:>12} {:>12} {:>12} {:>12} {:>8}",
        "Datetime", "Open", "High", "Low", "Close", "Volume", "Size"
    );
    for bar in &bars[start..] {
        println!(
            "{:<28} {:>12} {:>12} {:>12} {:>12} {:>12} {:>8}",
            format_bar_time(bar.open_time),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume,
            bar.threshold
        );
    }

    println!();
    println!("Bars:           {}", archive.len());
    if let (Some(first), Some(last)) = (bars.first(), archive.last_day()) {
        let days: std::collections::BTreeSet<_> = bars.iter().map(RangeBar::day).collect();
        println!("Days:           {} ({} to {last})", days.len(), first.day());
    }
    if let Some(threshold) = archive.last_threshold() {
        println!("Last threshold: {threshold}");
    }
    println!("Total volume:   {}", archive.total_volume());
    Ok(())
}
