//! Review-Ripple main entry point
//!
//! This is the command-line interface for the Review-Ripple review harvester.

use anyhow::Context;
use clap::Parser;
use review_ripple::config::{load_config_with_hash, Config};
use review_ripple::crawler::{FeedHarvest, HarvestReport, Harvester};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Review-Ripple: harvest every review for the listings matching a search
///
/// Discovers listings for QUERY, then walks each listing's recommended and
/// not-recommended review feeds to the end.
#[derive(Parser, Debug)]
#[command(name = "review-ripple")]
#[command(version = "1.0.0")]
#[command(about = "Harvest reviews for listings matching a search", long_about = None)]
struct Cli {
    /// Location to search listings for (e.g. "London")
    #[arg(value_name = "QUERY")]
    query: String,

    /// Maximum number of listings to harvest
    #[arg(short, long, default_value_t = 10)]
    count: usize,

    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    let harvester = Harvester::new(&config)?;
    let report = harvester.harvest(&cli.query, cli.count).await?;

    print_report(&report);

    for failure in &report.failures {
        match failure.feed {
            Some(feed) => tracing::error!("{} ({}): {}", failure.listing, feed, failure.error),
            None => tracing::error!("{}: {}", failure.listing, failure.error),
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("review_ripple=info,warn"),
            1 => EnvFilter::new("review_ripple=debug,info"),
            2 => EnvFilter::new("review_ripple=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_report(report: &HarvestReport) {
    for listing in &report.listings {
        println!("=== {} ===", listing.listing);
        for feed in listing.feeds() {
            print_feed(feed);
        }
        println!();
    }

    println!(
        "✓ {} reviews from {} listings ({} skipped as malformed, {} failures)",
        report.review_count(),
        report.listings.len(),
        report.issue_count(),
        report.failures.len()
    );
}

fn print_feed(feed: &FeedHarvest) {
    let marker = if feed.is_truncated() { " (truncated)" } else { "" };
    println!("-- {} ({} reviews){}", feed.feed, feed.reviews.len(), marker);
    for review in &feed.reviews {
        println!("{}", review);
    }
}
