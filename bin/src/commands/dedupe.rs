//! Dedupe command implementation.
//!
//! Rewrites a tick file so that no two rows share a timestamp.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use ranger_lib::TimestampDeduplicator;
use ranger_lib::prelude::*;

use crate::display::{Format, write_ticks};

/// Arguments for `ranger dedupe`.
#[derive(Debug, Args)]
pub(crate) struct DedupeArgs {
    /// Tick file (CSV or Parquet)
    pub(crate) input: PathBuf,

    /// Output file
    #[arg(short, long)]
    pub(crate) output: PathBuf,

    /// Output format (inferred from the output extension when omitted)
    #[arg(short, long, value_enum)]
    pub(crate) format: Option<Format>,

    /// Overwrite an existing output file
    #[arg(long)]
    pub(crate) force: bool,
}

/// Rewrite a tick file with unique timestamps.
pub(crate) async fn dedupe(args: DedupeArgs, quiet: bool) -> Result<()> {
    if args.output.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            args.output.display()
        );
    }

    let batch = read_ticks(&args.input)
        .await
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let mut dedup = TimestampDeduplicator::new();
    let mut ticks = batch.ticks;
    for tick in &mut ticks {
        dedup.apply(tick);
    }

    let format = Format::resolve(args.format, &args.output);
    write_ticks(&ticks, &args.output, format)?;

    if !quiet {
        println!("Ticks:   {}", ticks.len());
        println!("Shifted: {}", dedup.shifted());
        if batch.skipped_rows > 0 {
            println!("Skipped: {} malformed rows", batch.skipped_rows);
        }
        println!("Output written to: {}", args.output.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dedupe_tick_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("20240115.csv");
        std::fs::write(
            &input,
            "datetime,last,volume\n\
             2024-01-15 10:00:00,100,1\n\
             2024-01-15 10:00:00,101,2\n\
             2024-01-15 10:00:00,102,3\n\
             2024-01-15 10:00:01,103,4\n",
        )
        .unwrap();
        let output = dir.path().join("unique.csv");

        dedupe(
            DedupeArgs {
                input,
                output: output.clone(),
                format: None,
                force: false,
            },
            true,
        )
        .await
        .unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines[0], "datetime,last,volume");
        assert_eq!(lines[1], "2024-01-15 10:00:00.000000,100,1");
        assert_eq!(lines[2], "2024-01-15 10:00:00.001000,101,2");
        assert_eq!(lines[3], "2024-01-15 10:00:00.002000,102,3");
        assert_eq!(lines[4], "2024-01-15 10:00:01.000000,103,4");
    }
}
