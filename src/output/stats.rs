//! Live crawl counters
//!
//! Workers bump these as they go; a [`StatsSnapshot`] freezes them for the
//! run report. Duplicates, out-of-scope links and backpressure drops are
//! counted separately even though the crawler treats them all as "skip".

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by all workers of one run
#[derive(Debug, Default)]
pub struct CrawlStats {
    fetched: AtomicU64,
    failed: AtomicU64,
    non_html: AtomicU64,
    links_found: AtomicU64,
    queued: AtomicU64,
    duplicates: AtomicU64,
    out_of_scope: AtomicU64,
    dropped: AtomicU64,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful fetch and returns the running total
    pub fn record_fetched(&self) -> u64 {
        self.fetched.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_non_html(&self) {
        self.non_html.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_links_found(&self, count: usize) {
        self.links_found.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_queued(&self) {
        self.queued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_duplicate(&self) {
        self.duplicates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_out_of_scope(&self) {
        self.out_of_scope.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            fetched: self.fetched.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            non_html: self.non_html.load(Ordering::Relaxed),
            links_found: self.links_found.load(Ordering::Relaxed),
            queued: self.queued.load(Ordering::Relaxed),
            duplicates: self.duplicates.load(Ordering::Relaxed),
            out_of_scope: self.out_of_scope.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`CrawlStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Pages fetched with a 2xx response
    pub fetched: u64,

    /// Fetches that failed (timeout, non-2xx, transport, body)
    pub failed: u64,

    /// Fetched pages whose content type was not HTML
    pub non_html: u64,

    /// Links extracted from HTML pages, before filtering
    pub links_found: u64,

    /// URLs accepted by the frontier (seed included)
    pub queued: u64,

    /// URLs skipped because they were already visited
    pub duplicates: u64,

    /// Links skipped because their host is outside the crawl scope
    pub out_of_scope: u64,

    /// Links refused by a full frontier
    pub dropped: u64,
}
