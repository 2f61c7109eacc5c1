//! ranger CLI - range-bar archives from daily tick files.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

use commands::convert::ConvertArgs;
use commands::dedupe::DedupeArgs;
use commands::extend::ExtendArgs;
use commands::files::FilesArgs;
use commands::show::ShowArgs;

#[derive(Parser)]
#[command(name = "ranger")]
#[command(about = "Build range-bar archives from daily tick files", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert day files into a fixed-threshold bar archive
    Convert(ConvertArgs),

    /// Append newer days to an archive, re-tuning the threshold after each day
    Extend(ExtendArgs),

    /// List the day files in a tick directory
    Files(FilesArgs),

    /// Print the last bars of an archive with a summary
    Show(ShowArgs),

    /// Rewrite a tick file so every timestamp is unique
    Dedupe(DedupeArgs),
}

/// Installs the log subscriber. `RUST_LOG` takes precedence over `-v`/`-q`.
fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Convert(args) => commands::convert::convert(args, cli.quiet).await,
        Commands::Extend(args) => commands::extend::extend(args, cli.quiet).await,
        Commands::Files(args) => commands::files::list_files(args).await,
        Commands::Show(args) => commands::show::show(args).await,
        Commands::Dedupe(args) => commands::dedupe::dedupe(args, cli.quiet).await,
    }
}
