//! Paper-Trail main entry point
//!
//! This is the command-line interface for the Paper-Trail archive crawler.

use anyhow::Context;
use clap::Parser;
use paper_trail::config::{load_config, Config};
use paper_trail::crawler::Coordinator;
use paper_trail::output::print_statistics;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::EnvFilter;

/// Paper-Trail: a polite newspaper-archive crawler
///
/// Crawls one collection of a digital-library mirror breadth-first, keeps the
/// pages that look like articles and appends them to a JSON Lines file as
/// {"url", "title", "text"} records.
#[derive(Parser, Debug)]
#[command(name = "paper-trail")]
#[command(version)]
#[command(about = "A polite newspaper-archive crawler", long_about = None)]
struct Cli {
    /// Seed URL; links are followed only within its host and path
    #[arg(long, value_name = "URL", required_unless_present = "config")]
    start_url: Option<String>,

    /// JSON Lines file to append article records to
    #[arg(long, value_name = "PATH", required_unless_present = "config")]
    output: Option<PathBuf>,

    /// Maximum number of pages to fetch [default: 200]
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Pause between pages, in seconds (1.0 or more recommended) [default: 1.0]
    #[arg(long, value_name = "SECONDS")]
    delay: Option<f64>,

    /// Per-request timeout, in seconds [default: 15]
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<f64>,

    /// User-Agent header to send
    #[arg(long, value_name = "STRING")]
    user_agent: Option<String>,

    /// Restrict the crawl to this path prefix instead of the start URL's path
    #[arg(long, value_name = "PATH")]
    scope_prefix: Option<String>,

    /// Truncate the output file instead of appending to it
    #[arg(long)]
    overwrite: bool,

    /// TOML configuration file; flags given on the command line take precedence
    #[arg(long, value_name = "FILE")]
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

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let quiet = cli.quiet;
    let config = match build_config(cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {:#}", e);
            return Err(e);
        }
    };

    let mut coordinator = Coordinator::new(config).context("Failed to start crawl")?;

    // First Ctrl-C stops the crawl between pages, a second one exits at once.
    // Lines already written stay intact either way.
    let stop = coordinator.stop_handle();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            match on_interrupt(&stop) {
                InterruptAction::StopAfterPage => tracing::warn!(
                    "Interrupt received, stopping after the current page (Ctrl-C again to exit now)"
                ),
                InterruptAction::ExitNow => {
                    tracing::warn!("Second interrupt received, exiting");
                    std::process::exit(130);
                }
            }
        }
    });

    match coordinator.run().await {
        Ok(stats) => {
            tracing::info!("Crawl completed successfully");
            if !quiet {
                print_statistics(&stats);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// What a Ctrl-C should do given the interrupts seen so far
#[derive(Debug, PartialEq, Eq)]
enum InterruptAction {
    StopAfterPage,
    ExitNow,
}

/// Raises the stop flag; reports `ExitNow` if it was already raised
fn on_interrupt(stop: &AtomicBool) -> InterruptAction {
    if stop.swap(true, Ordering::SeqCst) {
        InterruptAction::ExitNow
    } else {
        InterruptAction::StopAfterPage
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("paper_trail=info,warn"),
            1 => EnvFilter::new("paper_trail=debug,info"),
            2 => EnvFilter::new("paper_trail=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Builds the run configuration from the config file (if any) and the flags
fn build_config(cli: Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load {}", path.display()))?
        }
        // clap requires --start-url and --output when there is no config file
        None => Config::new(String::new(), String::new()),
    };

    if let Some(start_url) = cli.start_url {
        config.crawler.start_url = start_url;
    }
    if let Some(output) = cli.output {
        config.output.path = output.to_string_lossy().to_string();
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(delay) = cli.delay {
        config.crawler.delay = delay;
    }
    if let Some(timeout) = cli.timeout {
        config.http.timeout = timeout;
    }
    if let Some(user_agent) = cli.user_agent {
        config.http.user_agent = user_agent;
    }
    if let Some(prefix) = cli.scope_prefix {
        config.crawler.scope_prefix = Some(prefix);
    }
    if cli.overwrite {
        config.output.overwrite = true;
    }

    Ok(config)
}
