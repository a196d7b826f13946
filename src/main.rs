//! Venuz scraper main entry point
//!
//! This is the command-line interface for the listing-site harvester.

use anyhow::Context;
use clap::Parser;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use venuz_scraper::config::load_config;
use venuz_scraper::crawler::run;
use venuz_scraper::output::print_summary;

/// Venuz scraper: a resumable listing-site harvester
///
/// Walks a fixed set of listing pages, extracts site entries, resolves
/// their redirector links and uploads the deduplicated result. Categories
/// completed by an earlier run are skipped.
#[derive(Parser, Debug)]
#[command(name = "venuz-scraper")]
#[command(version = "1.0.0")]
#[command(about = "A resumable listing-site harvester", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Start a fresh run, ignoring the existing checkpoint
    #[arg(long)]
    fresh: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config().context("Failed to load configuration")?;

    std::fs::create_dir_all(&config.data_dir).with_context(|| {
        format!(
            "Failed to create data directory {}",
            config.data_dir.display()
        )
    })?;

    setup_logging(cli.verbose, cli.quiet, &config.log_path())?;

    tracing::info!("Data directory: {}", config.data_dir.display());
    tracing::info!("Listing site: {}", config.listing.base_url);
    if config.sink.credential.is_none() {
        tracing::warn!("No sink credential configured; records will only be saved locally");
    }

    let summary = match run(&config, cli.fresh).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            return Err(e.into());
        }
    };

    if !cli.quiet {
        print_summary(&summary);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Events go to stdout and, without ANSI colours, to the log file.
fn setup_logging(verbose: u8, quiet: bool, log_path: &Path) -> anyhow::Result<()> {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("venuz_scraper=info,warn"),
            1 => EnvFilter::new("venuz_scraper=debug,info"),
            2 => EnvFilter::new("venuz_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(log_file)),
        )
        .init();

    Ok(())
}
