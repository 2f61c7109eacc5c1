//! Files command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use ranger_lib::prelude::*;

/// Arguments for `ranger files`.
#[derive(Debug, Args)]
pub(crate) struct FilesArgs {
    /// Directory of YYYYMMDD day files
    pub(crate) tick_dir: PathBuf,

    /// Only list days strictly after this date (YYYY-MM-DD)
    #[arg(long)]
    pub(crate) after: Option<NaiveDate>,
}

/// List the day files in a tick directory.
pub(crate) async fn list_files(args: FilesArgs) -> Result<()> {
    let scan = scan_day_files(&args.tick_dir)
        .await
        .with_context(|| format!("Failed to scan {}", args.tick_dir.display()))?;

    let files: Vec<&DayFile> = match args.after {
        Some(date) => scan.after(date).collect(),
        None => scan.files.iter().collect(),
    };

    println!("{:<12} {:<8} File", "Date", "Kind");
    println!("{}", "-".repeat(60));
    for file in &files {
        let name = file
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("{:<12} {:<8} {}", file.date, file.kind.extension(), name);
    }

    if !scan.skipped.is_empty() {
        println!();
        println!("Skipped (name is not YYYYMMDD):");
        for path in &scan.skipped {
            println!("  {}", path.display());
        }
    }

    println!();
    println!("Total: {} day files", files.len());
    Ok(())
}
