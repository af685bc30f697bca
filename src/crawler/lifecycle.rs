//! Crawler lifecycle state machine
//!
//! A crawler moves through exactly three states: Ready (accepts seed URLs),
//! Running (workers active), Stopped (terminal). The state lives in a single
//! atomic and every transition is a compare-and-swap, so concurrent `stop`
//! calls race safely and exactly one of them performs the transition.

use crate::CrawlError;
use std::sync::atomic::{AtomicU8, Ordering};

/// Discrete lifecycle state of a [`Crawler`](crate::Crawler).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CrawlerState {
    /// Initial state; seed URLs may be added, workers not yet launched.
    Ready = 0,
    /// Workers and the flush loop are active.
    Running = 1,
    /// Terminal. A stopped crawler cannot be restarted.
    Stopped = 2,
}

impl CrawlerState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Ready,
            1 => Self::Running,
            _ => Self::Stopped,
        }
    }
}

/// Atomically-guarded lifecycle flag shared by workers, the flush loop, and
/// external callers.
pub(crate) struct Lifecycle {
    state: AtomicU8,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(CrawlerState::Ready as u8),
        }
    }

    /// Reads the instantaneous state.
    pub fn current(&self) -> CrawlerState {
        CrawlerState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Transitions Ready -> Running.
    ///
    /// Fails when the crawler is already running or already stopped; a
    /// crawler only ever starts once.
    pub fn begin(&self) -> Result<(), CrawlError> {
        self.state
            .compare_exchange(
                CrawlerState::Ready as u8,
                CrawlerState::Running as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map(|_| ())
            .map_err(|_| CrawlError::AlreadyRunning)
    }

    /// Transitions to Stopped from any state.
    ///
    /// Returns true for exactly one caller, no matter how many race; all
    /// later calls are no-ops.
    pub fn stop(&self) -> bool {
        self.state.swap(CrawlerState::Stopped as u8, Ordering::AcqRel)
            != CrawlerState::Stopped as u8
    }
}
