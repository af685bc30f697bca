//! Crawler configuration
//!
//! Configuration comes from an optional TOML file, with every field carrying
//! a reference default; the CLI layers flag and environment overrides on
//! top (see `main.rs`). Field names are kebab-case in the file.

use crate::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Complete crawler configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of concurrent crawl workers.
    pub workers: usize,

    /// Fixed sleep before each worker iteration, in milliseconds. Zero
    /// disables the delay.
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Capacity of the URL frontier queue.
    #[serde(rename = "frontier-capacity")]
    pub frontier_capacity: usize,

    /// Capacity of the scrape-result queue.
    #[serde(rename = "results-capacity")]
    pub results_capacity: usize,

    /// Seconds between flush cycles.
    #[serde(rename = "flush-interval-secs")]
    pub flush_interval_secs: u64,

    /// Frontier depth at which a flush cycle actually drains.
    #[serde(rename = "unvisited-low-water")]
    pub unvisited_low_water: usize,

    /// Result-queue depth at which a flush cycle actually drains.
    #[serde(rename = "visited-low-water")]
    pub visited_low_water: usize,

    /// Seconds granted to in-flight fetches after a stop before workers
    /// are aborted.
    #[serde(rename = "shutdown-grace-secs")]
    pub shutdown_grace_secs: u64,

    /// Overall per-request HTTP timeout in seconds.
    #[serde(rename = "http-timeout-secs")]
    pub http_timeout_secs: u64,

    /// Path to the SQLite database file.
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// User agent string sent with every request.
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workers: 10,
            request_delay_ms: 0,
            frontier_capacity: 500,
            results_capacity: 500,
            flush_interval_secs: 10,
            unvisited_low_water: 100,
            visited_low_water: 50,
            shutdown_grace_secs: 30,
            http_timeout_secs: 30,
            database_path: "./trawl.db".to_string(),
            user_agent: format!("trawl/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn flush_interval(&self) -> Duration {
        Duration::from_secs(self.flush_interval_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Rejects configurations the engine cannot run with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.workers == 0 {
            return Err(ConfigError::Validation(
                "workers must be at least 1".to_string(),
            ));
        }
        if self.frontier_capacity == 0 || self.results_capacity == 0 {
            return Err(ConfigError::Validation(
                "queue capacities must be at least 1".to_string(),
            ));
        }
        if self.flush_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "flush-interval-secs must be at least 1".to_string(),
            ));
        }
        // A low-water mark above its queue's capacity can never trip, which
        // would leave a full queue waiting for the final drain
        if self.unvisited_low_water > self.frontier_capacity
            || self.visited_low_water > self.results_capacity
        {
            return Err(ConfigError::Validation(
                "low-water marks must not exceed queue capacities".to_string(),
            ));
        }
        Ok(())
    }
}

/// Loads configuration from a TOML file.
///
/// Missing keys fall back to the defaults; unknown keys are ignored.
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}
