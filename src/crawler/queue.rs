//! Bounded blocking FIFO queues shared between workers and the flush loop
//!
//! Both the URL frontier and the scrape-result queue are instances of
//! [`BoundedQueue`]. The queue provides the crawler's only backpressure
//! mechanism: enqueueing on a full queue suspends the producer until a
//! consumer makes room, and nothing is ever silently dropped.
//!
//! Built from a mutex-guarded ring buffer plus two [`Notify`] wakeup chains,
//! one per direction. Every state change that could unblock a waiter issues
//! a `notify_one`, and woken tasks re-check under the lock, so a wakeup that
//! loses the race simply goes back to waiting.

use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::Notify;

/// Error returned by [`BoundedQueue::enqueue`] once the queue is closed.
///
/// Carries the rejected item back to the caller.
#[derive(Debug, PartialEq, Eq)]
pub struct QueueClosed<T>(pub T);

struct Inner<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// A thread-safe, capacity-bounded, blocking FIFO with a terminal closed state.
///
/// Closing the queue wakes every waiter: blocked producers fail with
/// [`QueueClosed`], while consumers keep draining whatever was buffered and
/// only then observe the closed signal as `None`.
pub struct BoundedQueue<T> {
    inner: Mutex<Inner<T>>,
    capacity: usize,
    not_empty: Notify,
    not_full: Notify,
}

impl<T> BoundedQueue<T> {
    /// Creates a queue that holds at most `capacity` items.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be at least 1");
        Self {
            inner: Mutex::new(Inner {
                items: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            capacity,
            not_empty: Notify::new(),
            not_full: Notify::new(),
        }
    }

    /// Appends an item, waiting while the queue is at capacity.
    ///
    /// Returns the item inside [`QueueClosed`] if the queue was closed before
    /// space became available.
    pub async fn enqueue(&self, item: T) -> Result<(), QueueClosed<T>> {
        loop {
            {
                let mut inner = self.inner.lock().unwrap();
                if inner.closed {
                    drop(inner);
                    // Propagate the close signal to the next blocked producer
                    self.not_full.notify_one();
                    return Err(QueueClosed(item));
                }
                if inner.items.len() < self.capacity {
                    inner.items.push_back(item);
                    let has_space = inner.items.len() < self.capacity;
                    drop(inner);
                    self.not_empty.notify_one();
                    if has_space {
                        self.not_full.notify_one();
                    }
                    return Ok(());
                }
            }
            self.not_full.notified().await;
        }
    }

    /// Removes the oldest item, waiting while the queue is empty.
    ///
    /// Returns `None` only once the queue is closed and fully drained.
    pub async fn dequeue(&self) -> Option<T> {
        loop {
            {
                let mut inner = self.inner.lock().unwrap();
                if let Some(item) = inner.items.pop_front() {
                    let has_more = !inner.items.is_empty();
                    drop(inner);
                    self.not_full.notify_one();
                    if has_more {
                        self.not_empty.notify_one();
                    }
                    return Some(item);
                }
                if inner.closed {
                    drop(inner);
                    self.not_empty.notify_one();
                    return None;
                }
            }
            self.not_empty.notified().await;
        }
    }

    /// Removes the oldest item without waiting.
    pub fn try_dequeue(&self) -> Option<T> {
        let mut inner = self.inner.lock().unwrap();
        let item = inner.items.pop_front();
        drop(inner);
        if item.is_some() {
            self.not_full.notify_one();
        }
        item
    }

    /// Current depth of the queue.
    ///
    /// Inherently racy against concurrent producers and consumers; callers
    /// must treat it as an approximation that may change before they act.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().items.len()
    }

    /// Whether the queue is currently empty (same caveat as [`len`](Self::len)).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the queue has been closed.
    pub fn is_closed(&self) -> bool {
        self.inner.lock().unwrap().closed
    }

    /// Closes the queue, waking all current and future waiters. Idempotent.
    ///
    /// Buffered items remain dequeueable after close.
    pub fn close(&self) {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.closed = true;
        }
        self.not_empty.notify_waiters();
        self.not_full.notify_waiters();
        // Waiters that released the lock but have not registered yet are
        // missed by notify_waiters; a stored permit catches the stragglers
        // and each of them chains another on its way out.
        self.not_empty.notify_one();
        self.not_full.notify_one();
    }
}
