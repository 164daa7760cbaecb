//! Sumi-Census main entry point
//!
//! This is the command-line interface for the Sumi-Census link census.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use sumi_census::config::{load_config, validate, validate_seed_url, Config};
use sumi_census::crawler::http_crawler;
use sumi_census::output::{generate_markdown_report, print_report};
use tracing_subscriber::EnvFilter;

/// Sumi-Census: a same-host link census
///
/// Sumi-Census crawls every page reachable from SEED on SEED's host and reports
/// how many internal links point at each page, most referenced first.
#[derive(Parser, Debug)]
#[command(name = "sumi-census")]
#[command(version)]
#[command(about = "A same-host link census", long_about = None)]
struct Cli {
    /// URL to start crawling from
    #[arg(value_name = "SEED")]
    seed: String,

    /// Maximum number of pages fetched at the same time [default: 5]
    #[arg(value_name = "CONCURRENCY")]
    concurrency: Option<usize>,

    /// Maximum number of distinct pages to visit [default: 10]
    #[arg(value_name = "MAX_PAGES")]
    max_pages: Option<usize>,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Also write the report as markdown to this path
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

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

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli).context("Invalid configuration")?;
    let seed = validate_seed_url(&cli.seed).context("Invalid seed URL")?;

    let crawler = http_crawler(&config, seed).context("Failed to build HTTP client")?;

    // Ctrl-C stops admission; pages already in flight still finish
    let interrupt = {
        let crawler = crawler.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, finishing in-flight pages");
                crawler.cancel();
            }
        })
    };

    let report = crawler.run().await;
    interrupt.abort();

    print_report(&report);

    if let Some(path) = &cli.report {
        generate_markdown_report(&report, path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_census=info,warn"),
            1 => EnvFilter::new("sumi_census=debug,info"),
            2 => EnvFilter::new("sumi_census=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, if any, and applies command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(concurrency) = cli.concurrency {
        config.crawler.max_concurrency = concurrency;
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }

    validate(&config)?;
    Ok(config)
}
