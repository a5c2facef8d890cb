//! Scheduler: the worker pool and the per-URL pipeline
//!
//! This module handles:
//! - Spawning a fixed number of worker tasks onto a `JoinSet`
//! - The worker loop: pop, check-and-mark, fetch, extract, dispatch
//! - Tracking outstanding work so exhaustion closes the frontier
//!
//! # Exhaustion
//!
//! `PendingWork` counts URLs that are queued or held by a worker. It is
//! raised before a push and lowered once the popping worker has dispatched
//! every link of that page, so it can only reach zero when the frontier is
//! empty and no worker can push again. The worker that takes it to zero
//! closes the frontier, which lets every idle worker fall out of `pop`.
//! The decrement runs from a drop guard, so a worker that panics mid-page
//! still releases its unit.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::{Frontier, PushError};
use crate::crawler::parser::{is_html, LinkExtractor};
use crate::crawler::visited::VisitedSet;
use crate::output::CrawlStats;
use crate::state::{StopGuard, WorkerBoard, WorkerState};
use crate::url::CrawlScope;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Log a progress line every this many fetched pages
const PROGRESS_INTERVAL: u64 = 25;

/// Number of URLs queued or currently being processed
#[derive(Debug, Default)]
pub struct PendingWork {
    count: AtomicUsize,
}

impl PendingWork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves a slot for a URL about to be pushed
    pub fn add(&self) {
        self.count.fetch_add(1, Ordering::AcqRel);
    }

    /// Releases a reservation whose push was refused
    pub fn retract(&self) {
        self.count.fetch_sub(1, Ordering::AcqRel);
    }

    /// Marks one popped URL as fully processed
    ///
    /// Returns `true` if that was the last outstanding unit of work.
    pub fn finish(&self) -> bool {
        self.count.fetch_sub(1, Ordering::AcqRel) == 1
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }
}

/// Shared state of one crawl run plus the worker pipeline operating on it
///
/// The frontier, visited set and worker board are created per run and handed
/// in at construction; nothing here outlives the run.
pub struct Scheduler {
    scope: CrawlScope,
    frontier: Frontier,
    visited: VisitedSet,
    pending: PendingWork,
    stats: CrawlStats,
    board: WorkerBoard,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn LinkExtractor>,
    exhausted: AtomicBool,
}

/// Releases one unit of pending work when dropped, including on panic
struct FinishGuard<'a> {
    scheduler: &'a Scheduler,
    token: &'a CancellationToken,
}

impl Drop for FinishGuard<'_> {
    fn drop(&mut self) {
        self.scheduler.finish_one(self.token);
    }
}

impl Scheduler {
    /// Creates a scheduler for one run
    ///
    /// The number of workers is the size of `board`.
    pub fn new(
        scope: CrawlScope,
        frontier: Frontier,
        visited: VisitedSet,
        board: WorkerBoard,
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn LinkExtractor>,
    ) -> Self {
        Self {
            scope,
            frontier,
            visited,
            pending: PendingWork::new(),
            stats: CrawlStats::new(),
            board,
            fetcher,
            extractor,
            exhausted: AtomicBool::new(false),
        }
    }

    /// Offers a URL to the frontier, accounting for it as pending work
    ///
    /// # Returns
    ///
    /// * `true` - The URL was queued
    /// * `false` - The frontier refused it (full or closed); the URL is dropped
    pub fn enqueue(&self, url: String) -> bool {
        self.pending.add();
        match self.frontier.push(url) {
            Ok(()) => {
                self.stats.record_queued();
                true
            }
            Err(err) => {
                self.pending.retract();
                match err {
                    PushError::Full(url) => {
                        self.stats.record_dropped();
                        tracing::debug!("Frontier full, dropping {}", url);
                    }
                    PushError::Closed(url) => {
                        tracing::trace!("Frontier closed, dropping {}", url);
                    }
                }
                false
            }
        }
    }

    /// Spawns one task per board slot
    ///
    /// Every task holds a clone of `token`; the returned `JoinSet` is the
    /// barrier the caller waits on.
    pub fn spawn_workers(self: &Arc<Self>, token: &CancellationToken) -> JoinSet<()> {
        let mut pool = JoinSet::new();
        for id in 0..self.board.len() {
            pool.spawn(Arc::clone(self).run_worker(id, token.clone()));
        }
        pool
    }

    async fn run_worker(self: Arc<Self>, id: usize, token: CancellationToken) {
        let _stopped = StopGuard::new(&self.board, id);
        tracing::trace!("Worker {} started", id);

        while let Some(url) = self.frontier.pop(&token).await {
            let _finish = FinishGuard {
                scheduler: &self,
                token: &token,
            };
            self.process(id, &url, &token).await;
            self.board.set(id, WorkerState::Idle);
        }

        tracing::trace!("Worker {} stopped", id);
    }

    /// Marks one popped URL as done, closing the frontier after the last one
    ///
    /// Running out of work only counts as exhaustion if the run had not been
    /// cancelled by then; aborted fetches also drive the count to zero.
    fn finish_one(&self, token: &CancellationToken) {
        if self.pending.finish() {
            if !token.is_cancelled() {
                self.exhausted.store(true, Ordering::Release);
            }
            tracing::debug!("No pending work left, closing frontier");
            self.frontier.close();
        }
    }

    /// Returns true once the crawl has run out of work on its own
    ///
    /// Stays true even if the run is cancelled afterwards.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted.load(Ordering::Acquire)
    }

    /// Runs one popped URL through check-and-mark, fetch, extract and dispatch
    async fn process(&self, id: usize, url: &str, token: &CancellationToken) {
        if token.is_cancelled() {
            return;
        }

        self.board.set(id, WorkerState::Fetching);
        if !self.visited.check_and_mark(url) {
            self.stats.record_duplicate();
            tracing::trace!("Already visited {}", url);
            return;
        }

        tracing::debug!("Worker {} fetching {}", id, url);
        let page = match self.fetcher.fetch(url, token).await {
            Ok(page) => page,
            Err(e) if e.is_cancelled() => {
                tracing::debug!("Fetch of {} cancelled", url);
                return;
            }
            Err(e) => {
                self.stats.record_failed();
                tracing::warn!("Failed to fetch {}: {}", url, e);
                return;
            }
        };

        let fetched = self.stats.record_fetched();
        if fetched % PROGRESS_INTERVAL == 0 {
            tracing::info!(
                "Progress: {} pages fetched, {} visited, {} in frontier",
                fetched,
                self.visited.len(),
                self.frontier.len()
            );
        }

        if !is_html(&page.content_type) {
            self.stats.record_non_html();
            tracing::debug!("Skipping non-HTML {} ({})", url, page.content_type);
            return;
        }

        self.board.set(id, WorkerState::Extracting);
        let base = match Url::parse(url) {
            Ok(base) => base,
            Err(e) => {
                tracing::debug!("Cannot use {} as a base URL: {}", url, e);
                return;
            }
        };
        let links = self.extractor.extract(&page.body, &base);
        drop(page);
        self.stats.record_links_found(links.len());

        self.board.set(id, WorkerState::Dispatching);
        self.dispatch(links, token);
    }

    /// Filters extracted links and pushes the survivors
    fn dispatch(&self, links: Vec<String>, token: &CancellationToken) {
        for link in links {
            if token.is_cancelled() {
                break;
            }

            if !self.scope.contains(&link) {
                self.stats.record_out_of_scope();
                tracing::trace!("Out of scope: {}", link);
                continue;
            }

            // Hint only: the authoritative check happens after pop.
            if self.visited.contains(&link) {
                self.stats.record_duplicate();
                continue;
            }

            self.enqueue(link);
        }
    }

    pub fn scope(&self) -> &CrawlScope {
        &self.scope
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    pub fn pending(&self) -> &PendingWork {
        &self.pending
    }

    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    pub fn board(&self) -> &WorkerBoard {
        &self.board
    }
}
