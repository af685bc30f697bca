//! The concurrent crawl engine
//!
//! This module contains the crawler core: the bounded queues, the lifecycle
//! state machine, the worker pool, the flush controller, and the
//! [`Crawler`] aggregate that wires them together, plus the fetch/parse
//! collaborators the workers call into.

mod coordinator;
mod fetcher;
mod flush;
mod lifecycle;
mod parser;
mod queue;
mod scrape;
mod worker;

pub use coordinator::{Crawler, StopHandle};
pub use fetcher::{build_http_client, fetch_page, is_valid_content_type, FetchError};
pub use lifecycle::CrawlerState;
pub use parser::extract_links;
pub use queue::{BoundedQueue, QueueClosed};
pub use scrape::{scrape_page, ScrapeResult};
