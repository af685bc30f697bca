//! Crawler aggregate root
//!
//! [`Crawler`] owns the frontier, the result queue, the lifecycle state, the
//! HTTP client, and a handle to the storage sink. It is created once per
//! crawl run; a stopped crawler cannot be restarted.
//!
//! `start` is a synchronous "run to completion" call: it launches the worker
//! pool and the flush controller, then blocks until every worker has exited
//! and the final drain has landed. Shutdown is driven entirely by `stop`,
//! which may be called from any task (or a signal handler) through a
//! cloneable [`StopHandle`].
//!
//! Discovered links are re-enqueued every time they are seen; there is no
//! visited-set, so on cyclic link graphs the crawl revisits pages until
//! stopped. Storage records every discovery, and consumers dedup there.

use crate::config::Config;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::flush::FlushController;
use crate::crawler::lifecycle::Lifecycle;
use crate::crawler::queue::BoundedQueue;
use crate::crawler::scrape::ScrapeResult;
use crate::crawler::worker::Worker;
use crate::crawler::CrawlerState;
use crate::storage::SharedStorage;
use crate::url::validate_url;
use crate::{CrawlError, Result};
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::task::JoinSet;

/// The crawl engine: worker pool, queues, flush loop, lifecycle.
pub struct Crawler {
    config: Config,
    frontier: Arc<BoundedQueue<String>>,
    results: Arc<BoundedQueue<ScrapeResult>>,
    lifecycle: Arc<Lifecycle>,
    storage: SharedStorage,
    client: Client,
    final_drain: Arc<Notify>,
}

/// Cloneable handle that can stop a running crawler from anywhere.
///
/// Stopping flips the lifecycle to Stopped and closes the frontier so
/// workers parked on an empty queue wake up and observe shutdown. The
/// result queue stays open: fetches finishing inside the grace period can
/// still record their outcome, and the flush loop keeps draining until the
/// pool is down.
#[derive(Clone)]
pub struct StopHandle {
    lifecycle: Arc<Lifecycle>,
    frontier: Arc<BoundedQueue<String>>,
}

impl StopHandle {
    pub(crate) fn new(lifecycle: Arc<Lifecycle>, frontier: Arc<BoundedQueue<String>>) -> Self {
        Self {
            lifecycle,
            frontier,
        }
    }

    /// Requests a stop. Idempotent; safe to call from concurrent tasks.
    pub fn stop(&self) {
        if self.lifecycle.stop() {
            tracing::info!("stop requested, workers will exit at their next iteration boundary");
        }
        // Closing is idempotent, so losers of the transition race still
        // guarantee nobody stays parked on an empty frontier. Buffered URLs
        // remain drainable for the final flush.
        self.frontier.close();
    }
}

impl Crawler {
    /// Creates a crawler from a validated configuration and a storage sink.
    pub fn new(config: Config, storage: SharedStorage) -> Result<Self> {
        config.validate()?;
        let client = build_http_client(&config.user_agent, config.http_timeout())?;

        Ok(Self {
            frontier: Arc::new(BoundedQueue::new(config.frontier_capacity)),
            results: Arc::new(BoundedQueue::new(config.results_capacity)),
            lifecycle: Arc::new(Lifecycle::new()),
            storage,
            client,
            final_drain: Arc::new(Notify::new()),
            config,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CrawlerState {
        self.lifecycle.current()
    }

    /// Approximate number of URLs waiting in the frontier.
    pub fn frontier_depth(&self) -> usize {
        self.frontier.len()
    }

    /// Approximate number of scrape results awaiting flush.
    pub fn pending_results(&self) -> usize {
        self.results.len()
    }

    /// Returns a handle that can stop this crawler from another task.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle::new(Arc::clone(&self.lifecycle), Arc::clone(&self.frontier))
    }

    /// Requests a stop. Idempotent. See [`StopHandle::stop`].
    pub fn stop(&self) {
        self.stop_handle().stop();
    }

    /// Validates and enqueues URLs onto the frontier.
    ///
    /// Accepted while Ready or Running; fails with
    /// [`CrawlError::CrawlerStopped`] once stopped. Invalid URLs are logged
    /// and discarded without failing the batch. Blocks when the frontier is
    /// full. Returns the number of URLs enqueued.
    pub async fn add_urls<I, S>(&self, urls: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.lifecycle.current() == CrawlerState::Stopped {
            return Err(CrawlError::CrawlerStopped);
        }

        let mut added = 0;
        for raw in urls {
            let raw = raw.as_ref();
            match validate_url(raw) {
                Some(url) => {
                    tracing::debug!(url = %url, "adding URL to frontier");
                    if self.frontier.enqueue(url).await.is_err() {
                        // The queue closed under us: a concurrent stop
                        return Err(CrawlError::CrawlerStopped);
                    }
                    added += 1;
                }
                None => tracing::debug!(url = raw, "discarding invalid URL"),
            }
        }
        Ok(added)
    }

    /// Runs the crawl until stopped.
    ///
    /// Transitions Ready -> Running (failing with
    /// [`CrawlError::AlreadyRunning`] from any other state), launches the
    /// flush controller and the worker pool, and blocks until every worker
    /// has exited. The final drain runs after the pool is fully down, so no
    /// late result can slip past it. A storage failure inside the flush loop
    /// stops the run and surfaces here as the call's error.
    pub async fn start(&self) -> Result<()> {
        self.lifecycle.begin()?;
        tracing::info!(
            workers = self.config.workers,
            delay_ms = self.config.request_delay_ms,
            "starting crawl"
        );

        let flush = FlushController {
            frontier: Arc::clone(&self.frontier),
            results: Arc::clone(&self.results),
            storage: Arc::clone(&self.storage),
            stop: self.stop_handle(),
            interval: self.config.flush_interval(),
            unvisited_low_water: self.config.unvisited_low_water,
            visited_low_water: self.config.visited_low_water,
            final_drain: Arc::clone(&self.final_drain),
        };
        let flush_handle = tokio::spawn(flush.run());

        let mut pool = JoinSet::new();
        for id in 0..self.config.workers {
            pool.spawn(
                Worker {
                    id,
                    frontier: Arc::clone(&self.frontier),
                    results: Arc::clone(&self.results),
                    lifecycle: Arc::clone(&self.lifecycle),
                    client: self.client.clone(),
                    delay: self.config.request_delay(),
                }
                .run(),
            );
        }

        self.join_workers(&mut pool).await;
        tracing::info!("all workers finished");

        // Make the terminal state observable even when the pool drained on
        // its own, then let the flush loop take its closing pass. With the
        // pool down nothing produces results anymore, so the queue can close.
        self.stop();
        self.results.close();
        self.final_drain.notify_one();

        match flush_handle.await {
            Ok(result) => result,
            Err(e) => Err(CrawlError::Storage(crate::storage::StorageError::Database(
                format!("flush task failed: {e}"),
            ))),
        }
    }

    /// Waits for every worker to exit.
    ///
    /// While Running this simply joins; once Stopped is observed, each
    /// remaining join gets the configured grace period for its in-flight
    /// fetch, after which stragglers are aborted.
    async fn join_workers(&self, pool: &mut JoinSet<()>) {
        loop {
            let joined = if self.lifecycle.current() == CrawlerState::Stopped {
                match tokio::time::timeout(self.config.shutdown_grace(), pool.join_next()).await {
                    Ok(joined) => joined,
                    Err(_) => {
                        tracing::warn!(
                            stragglers = pool.len(),
                            "shutdown grace period elapsed, aborting in-flight workers"
                        );
                        pool.abort_all();
                        while pool.join_next().await.is_some() {}
                        return;
                    }
                }
            } else {
                pool.join_next().await
            };

            match joined {
                Some(Ok(())) => {}
                Some(Err(e)) => tracing::warn!(error = %e, "worker task aborted"),
                None => return,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Storage, StorageResult, UrlRow};
    use std::sync::Mutex;

    struct NullStorage;

    impl Storage for NullStorage {
        fn persist_batch(&mut self, _rows: &[UrlRow]) -> StorageResult<()> {
            Ok(())
        }
    }

    fn test_crawler() -> Crawler {
        let storage: SharedStorage = Arc::new(Mutex::new(NullStorage));
        Crawler::new(Config::default(), storage).expect("crawler should build")
    }

    #[tokio::test]
    async fn test_new_crawler_is_ready() {
        let crawler = test_crawler();
        assert_eq!(crawler.state(), CrawlerState::Ready);
    }

    #[tokio::test]
    async fn test_add_urls_filters_invalid() {
        let crawler = test_crawler();
        let added = crawler
            .add_urls([
                "https://a.test/",
                "relative/path",
                "ftp://files.test/",
                "https://b.test/",
            ])
            .await
            .unwrap();
        assert_eq!(added, 2);
        assert_eq!(crawler.frontier_depth(), 2);
    }

    #[tokio::test]
    async fn test_add_urls_after_stop_fails() {
        let crawler = test_crawler();
        crawler.stop();
        let result = crawler.add_urls(["https://a.test/"]).await;
        assert!(matches!(result, Err(CrawlError::CrawlerStopped)));
        assert_eq!(crawler.frontier_depth(), 0);
    }

    #[tokio::test]
    async fn test_start_after_stop_fails() {
        let crawler = test_crawler();
        crawler.stop();
        let result = crawler.start().await;
        assert!(matches!(result, Err(CrawlError::AlreadyRunning)));
        assert_eq!(crawler.state(), CrawlerState::Stopped);
    }

    #[tokio::test]
    async fn test_stop_is_idempotent_across_handles() {
        let crawler = test_crawler();
        let handle = crawler.stop_handle();

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let handle = handle.clone();
            tasks.push(tokio::spawn(async move { handle.stop() }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(crawler.state(), CrawlerState::Stopped);
    }
}
