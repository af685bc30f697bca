//! Trawl main entry point
//!
//! Command-line interface for the breadth-first crawler: seed URLs come in
//! as positional arguments, tuning knobs from flags, environment variables,
//! or an optional TOML config file, and Ctrl-C requests a graceful stop.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;
use trawl::config::{load_config, Config};
use trawl::storage::{SharedStorage, SqliteStorage};
use trawl::Crawler;

/// Trawl: a breadth-first web crawler
///
/// Fetches the seed pages, follows every discovered link breadth-first, and
/// records visited and pending URLs in a SQLite database. Runs until
/// interrupted.
#[derive(Parser, Debug)]
#[command(name = "trawl")]
#[command(version)]
#[command(about = "A breadth-first web crawler", long_about = None)]
struct Cli {
    /// Seed URLs to start crawling from
    #[arg(value_name = "URL", required = true)]
    seeds: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "PATH", env = "TRAWL_CONFIG")]
    config: Option<PathBuf>,

    /// Number of concurrent crawl workers
    #[arg(long, env = "TRAWL_WORKERS")]
    workers: Option<usize>,

    /// Delay before each request, in milliseconds
    #[arg(long, value_name = "MS", env = "TRAWL_DELAY_MS")]
    delay_ms: Option<u64>,

    /// Path to the SQLite database file
    #[arg(long, value_name = "PATH", env = "TRAWL_DATABASE")]
    database: Option<String>,

    /// Seconds between storage flushes
    #[arg(long, value_name = "SECS", env = "TRAWL_FLUSH_INTERVAL")]
    flush_interval: Option<u64>,

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

    let config = build_config(&cli)?;
    tracing::info!(
        workers = config.workers,
        database = %config.database_path,
        "configuration loaded"
    );

    let storage = SqliteStorage::new(Path::new(&config.database_path))
        .with_context(|| format!("failed to open database at {}", config.database_path))?;
    let storage: SharedStorage = Arc::new(Mutex::new(storage));

    let database_path = config.database_path.clone();
    let crawler = Crawler::new(config, storage).context("failed to create crawler")?;

    let added = crawler
        .add_urls(&cli.seeds)
        .await
        .context("failed to enqueue seed URLs")?;
    if added == 0 {
        anyhow::bail!("none of the provided seed URLs are valid absolute http(s) URLs");
    }
    tracing::info!(seeds = added, "seed URLs enqueued");

    // Ctrl-C requests a cooperative stop; in-flight fetches get the
    // configured grace period
    let stop = crawler.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, stopping crawl");
            stop.stop();
        }
    });

    let run = crawler.start().await;

    // Summarize whatever made it to disk, even after a failed run
    if let Ok(summary) = SqliteStorage::new(Path::new(&database_path)) {
        let visited = summary.count_urls(Some(true)).unwrap_or(0);
        let unvisited = summary.count_urls(Some(false)).unwrap_or(0);
        tracing::info!(visited, unvisited, "crawl summary");
    }

    run.context("crawl failed")?;
    tracing::info!("crawl finished");
    Ok(())
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("trawl=info,warn"),
            1 => EnvFilter::new("trawl=debug,info"),
            2 => EnvFilter::new("trawl=trace,debug"),
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

/// Builds the effective configuration: file values first, then flag and
/// environment overrides.
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(workers) = cli.workers {
        config.workers = workers;
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.request_delay_ms = delay_ms;
    }
    if let Some(database) = &cli.database {
        config.database_path = database.clone();
    }
    if let Some(flush_interval) = cli.flush_interval {
        config.flush_interval_secs = flush_interval;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}
