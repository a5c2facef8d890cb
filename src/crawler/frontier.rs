//! Frontier queue: bounded FIFO of URLs waiting for a worker
//!
//! # Backpressure
//!
//! `push` never waits. When the queue is at capacity it hands the URL back as
//! [`PushError::Full`] and the caller drops it. Pushes come from workers
//! that are themselves the only consumers, so a blocking push could leave
//! every worker waiting on a queue nobody drains.
//!
//! # Closing
//!
//! `close` is a one-time transition. Pushes are refused afterwards, while
//! `pop` keeps returning queued URLs until the queue is empty and only then
//! reports `None`.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

/// Default number of URLs the frontier holds
pub const DEFAULT_CAPACITY: usize = 100;

/// Reasons a push was refused; the URL is handed back to the caller
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PushError {
    #[error("frontier is full, refusing {0}")]
    Full(String),

    #[error("frontier is closed, refusing {0}")]
    Closed(String),
}

impl PushError {
    /// Returns the refused URL
    pub fn into_url(self) -> String {
        match self {
            Self::Full(url) | Self::Closed(url) => url,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    queue: VecDeque<String>,
    closed: bool,
}

/// Bounded, concurrency-safe FIFO shared by all workers of one run
#[derive(Debug)]
pub struct Frontier {
    inner: Mutex<Inner>,
    capacity: usize,
    available: Notify,
}

impl Frontier {
    /// Creates an empty frontier holding at most `capacity` URLs
    ///
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            capacity: capacity.max(1),
            available: Notify::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enqueues a URL without waiting
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The URL was queued
    /// * `Err(PushError::Full)` - The queue is at capacity
    /// * `Err(PushError::Closed)` - The queue has been closed
    pub fn push(&self, url: String) -> Result<(), PushError> {
        {
            let mut inner = self.lock();
            if inner.closed {
                return Err(PushError::Closed(url));
            }
            if inner.queue.len() >= self.capacity {
                return Err(PushError::Full(url));
            }
            inner.queue.push_back(url);
        }
        self.available.notify_one();
        Ok(())
    }

    /// Waits for the next URL
    ///
    /// # Returns
    ///
    /// * `Some(url)` - The oldest queued URL
    /// * `None` - The queue is closed and drained, or `cancel` fired
    pub async fn pop(&self, cancel: &CancellationToken) -> Option<String> {
        loop {
            if cancel.is_cancelled() {
                return None;
            }

            // Register interest before looking at the queue so a push or
            // close landing in between still wakes us.
            let notified = self.available.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut inner = self.lock();
                if let Some(url) = inner.queue.pop_front() {
                    let more = !inner.queue.is_empty();
                    drop(inner);
                    if more {
                        self.available.notify_one();
                    }
                    return Some(url);
                }
                if inner.closed {
                    return None;
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => return None,
                _ = &mut notified => {}
            }
        }
    }

    /// Closes the queue and wakes every waiting `pop`
    ///
    /// Calling it again has no further effect.
    pub fn close(&self) {
        let newly_closed = {
            let mut inner = self.lock();
            !std::mem::replace(&mut inner.closed, true)
        };
        if newly_closed {
            tracing::trace!("Frontier closed");
        }
        self.available.notify_waiters();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn len(&self) -> usize {
        self.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().queue.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for Frontier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
