//! Periodic queue flushing into durable storage
//!
//! The flush controller runs alongside the worker pool for the whole crawl.
//! On every interval tick it measures both queues and, once either passes
//! its low-water mark, drains up to the measured counts into a single batch:
//! frontier entries become unvisited rows, scrape results become visited
//! rows for their source URL. The batch goes to the sink as one atomic call.
//!
//! The measured lengths are approximations (producers keep running), which
//! is why the drain uses `try_dequeue` and stops early when a queue runs
//! dry. Anything enqueued after the measurement is picked up next cycle or
//! by the final drain.
//!
//! Storage failures are fatal to the run: the controller cannot keep
//! accumulating queue state it has nowhere to put, so it stops the crawler
//! and reports the error upward.

use crate::crawler::queue::BoundedQueue;
use crate::crawler::scrape::ScrapeResult;
use crate::crawler::StopHandle;
use crate::storage::{SharedStorage, UrlRow};
use crate::CrawlError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::MissedTickBehavior;

pub(crate) struct FlushController {
    pub frontier: Arc<BoundedQueue<String>>,
    pub results: Arc<BoundedQueue<ScrapeResult>>,
    pub storage: SharedStorage,
    pub stop: StopHandle,
    pub interval: Duration,
    pub unvisited_low_water: usize,
    pub visited_low_water: usize,
    pub final_drain: Arc<Notify>,
}

impl FlushController {
    /// Runs the flush loop until the final drain is requested or the sink
    /// fails.
    ///
    /// The final-drain signal arrives only after every worker has exited,
    /// so the closing flush sees the queues' true remainder.
    pub async fn run(self) -> Result<(), CrawlError> {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval fires immediately on the first tick; swallow it so the
        // first real flush happens a full interval into the run
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let pending = self.frontier.len();
                    let completed = self.results.len();
                    if pending < self.unvisited_low_water && completed < self.visited_low_water {
                        tracing::debug!(pending, completed, "queue depth below flush threshold");
                        continue;
                    }
                    if let Err(e) = self.flush(pending, completed) {
                        tracing::error!(error = %e, "storage sink failed, aborting crawl");
                        self.stop.stop();
                        // No drain is ever coming; close the result queue so
                        // workers blocked on a full one wake and exit
                        self.results.close();
                        return Err(e);
                    }
                }
                _ = self.final_drain.notified() => {
                    tracing::debug!("final drain requested");
                    let result = self.flush(self.frontier.len(), self.results.len());
                    if let Err(ref e) = result {
                        tracing::error!(error = %e, "final flush failed, queued URLs were lost");
                    }
                    return result;
                }
            }
        }
    }

    /// Drains up to the given counts from each queue and persists them as
    /// one atomic batch. An empty drain never reaches the sink.
    fn flush(&self, pending: usize, completed: usize) -> Result<(), CrawlError> {
        let mut rows = Vec::with_capacity(pending + completed);

        for _ in 0..pending {
            match self.frontier.try_dequeue() {
                Some(url) => rows.push(UrlRow::unvisited(url)),
                None => break,
            }
        }
        let unvisited = rows.len();

        for _ in 0..completed {
            match self.results.try_dequeue() {
                Some(result) => rows.push(UrlRow::visited(result.url)),
                None => break,
            }
        }
        let visited = rows.len() - unvisited;

        if rows.is_empty() {
            return Ok(());
        }

        tracing::info!(unvisited, visited, "flushing queued URLs to storage");
        let mut storage = self.storage.lock().unwrap();
        storage.persist_batch(&rows)?;
        Ok(())
    }
}
