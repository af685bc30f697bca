//! Crawl worker loop
//!
//! Each worker is an independent task sharing only the two queues and the
//! observable lifecycle state. The loop is the breadth-first engine: pull a
//! URL, scrape it, push the discovered links back onto the frontier, push
//! the result onto the result queue.
//!
//! Cancellation is cooperative. Workers check the lifecycle at the top of
//! every iteration and never have an in-flight fetch interrupted; a stop
//! request takes effect at the next iteration boundary.

use crate::crawler::lifecycle::Lifecycle;
use crate::crawler::queue::BoundedQueue;
use crate::crawler::scrape::{scrape_page, ScrapeResult};
use crate::crawler::CrawlerState;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

pub(crate) struct Worker {
    pub id: usize,
    pub frontier: Arc<BoundedQueue<String>>,
    pub results: Arc<BoundedQueue<ScrapeResult>>,
    pub lifecycle: Arc<Lifecycle>,
    pub client: Client,
    pub delay: Duration,
}

impl Worker {
    /// Runs the worker loop to completion.
    ///
    /// Exits when the lifecycle reaches Stopped, when the frontier is closed
    /// and drained, or when a queue handoff fails because shutdown closed
    /// the queues underneath it. Per-URL scrape failures are logged and
    /// skipped; they never terminate the worker.
    pub async fn run(self) {
        tracing::debug!(worker = self.id, "worker started");

        loop {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            if self.lifecycle.current() == CrawlerState::Stopped {
                tracing::debug!(worker = self.id, "stop observed, leaving");
                break;
            }

            let url = match self.frontier.dequeue().await {
                Some(url) => url,
                None => {
                    tracing::debug!(worker = self.id, "frontier closed and drained, leaving");
                    break;
                }
            };

            tracing::info!(worker = self.id, url = %url, "scraping page");
            let result = match scrape_page(&self.client, &url).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!(worker = self.id, url = %url, error = %e, "scrape failed");
                    continue;
                }
            };

            tracing::info!(
                worker = self.id,
                url = %result.url,
                found = result.links.len(),
                "scrape complete"
            );

            if !self.hand_off(result).await {
                tracing::debug!(worker = self.id, "queues closed during handoff, leaving");
                break;
            }
        }
    }

    /// Queues the result, then feeds discovered links back to the frontier.
    ///
    /// Both enqueues apply backpressure: a full queue suspends this worker
    /// until the flush loop drains it. Returns false once either queue is
    /// closed, which only happens during shutdown. The result goes first so
    /// a scrape that finished inside the shutdown grace period still gets
    /// its visited record even when the frontier already rejects new URLs.
    async fn hand_off(&self, result: ScrapeResult) -> bool {
        let links = result.links.clone();
        if self.results.enqueue(result).await.is_err() {
            return false;
        }
        for link in links {
            if self.frontier.enqueue(link).await.is_err() {
                return false;
            }
        }
        true
    }
}
