//! Crawler coordinator - one crawl run from seed to report
//!
//! This module ties the pieces of a run together:
//! - Validating the seed and deriving the crawl scope from it
//! - Creating the per-run frontier, visited set and worker board
//! - Spawning the worker pool and waiting on its join barrier
//! - Enforcing the optional wall-clock deadline
//! - Producing the final [`CrawlReport`]

use crate::config::{validate, Config};
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::{HtmlLinkExtractor, LinkExtractor};
use crate::crawler::scheduler::Scheduler;
use crate::crawler::visited::VisitedSet;
use crate::output::StatsSnapshot;
use crate::state::WorkerBoard;
use crate::url::{parse_seed, CrawlScope};
use crate::CrawlError;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StopReason {
    /// The frontier drained with no work in flight
    Exhausted,
    /// The caller's token was cancelled (signal or embedding code)
    Cancelled,
    /// The configured maximum duration elapsed
    Deadline,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Exhausted => "exhausted",
            Self::Cancelled => "cancelled",
            Self::Deadline => "deadline",
        };
        write!(f, "{}", s)
    }
}

/// Outcome of a finished run
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    /// Canonical form of the seed URL
    pub seed: String,

    /// Host every fetched URL belonged to
    pub host: String,

    pub started_at: DateTime<Utc>,

    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    pub elapsed: Duration,

    pub stop_reason: StopReason,

    /// Every URL that was marked visited, sorted
    ///
    /// Includes URLs whose fetch failed; a marked URL is never retried.
    pub visited: Vec<String>,

    pub stats: StatsSnapshot,

    /// Size of the worker pool
    pub workers: usize,

    /// Workers not yet in `Stopped` when the report was taken (always 0
    /// once the join barrier has passed)
    pub active_workers: usize,
}

fn serialize_secs<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_secs_f64())
}

/// Runs crawls with a fixed configuration and pluggable fetch/extract stages
pub struct Crawler {
    config: Config,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn LinkExtractor>,
}

impl Crawler {
    /// Creates a crawler that fetches over HTTP and extracts links from HTML
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to run
    /// * `Err(CrawlError)` - The configuration is invalid or the HTTP client
    ///   could not be built
    pub fn new(config: Config) -> Result<Self, CrawlError> {
        validate(&config)?;
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self::with_components(
            config,
            Arc::new(fetcher),
            Arc::new(HtmlLinkExtractor),
        ))
    }

    /// Creates a crawler with caller-supplied stages
    pub fn with_components(
        config: Config,
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn LinkExtractor>,
    ) -> Self {
        Self {
            config,
            fetcher,
            extractor,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Crawls every same-host page reachable from `seed`
    ///
    /// Returns after all workers have been joined. The run stops on the
    /// first of: `cancel` firing, the configured deadline passing, or the
    /// frontier running dry with nothing in flight. None of these is an
    /// error; see [`CrawlReport::stop_reason`].
    ///
    /// # Errors
    ///
    /// Only a malformed seed (unparseable, not http/https, or without a host)
    /// fails the run, before any fetch happens.
    pub async fn run(
        &self,
        seed: &str,
        cancel: &CancellationToken,
    ) -> Result<CrawlReport, CrawlError> {
        let seed_url = parse_seed(seed)?;
        let scope = CrawlScope::from_seed(&seed_url)?;
        let seed = String::from(seed_url);

        let settings = &self.config.crawler;
        let workers = settings.workers.max(1);

        let started_at = Utc::now();
        let start = Instant::now();

        tracing::info!(
            "Starting crawl of {} with {} workers (host: {}, queue capacity: {})",
            seed,
            workers,
            scope.host(),
            settings.queue_capacity
        );

        let scheduler = Arc::new(Scheduler::new(
            scope,
            Frontier::new(settings.queue_capacity),
            VisitedSet::new(),
            WorkerBoard::new(workers),
            Arc::clone(&self.fetcher),
            Arc::clone(&self.extractor),
        ));

        let token = cancel.child_token();
        if !scheduler.enqueue(seed.clone()) {
            scheduler.frontier().close();
        }

        let mut pool = scheduler.spawn_workers(&token);
        let deadline_hit = match settings.max_duration() {
            Some(limit) => join_with_deadline(&mut pool, &token, limit).await,
            None => {
                join_workers(&mut pool).await;
                false
            }
        };

        let stop_reason = if deadline_hit {
            StopReason::Deadline
        } else if scheduler.is_exhausted() {
            StopReason::Exhausted
        } else if cancel.is_cancelled() {
            StopReason::Cancelled
        } else {
            // The seed itself was refused, so there was never any work.
            StopReason::Exhausted
        };

        let mut visited: Vec<String> = scheduler.visited().snapshot().into_iter().collect();
        visited.sort();

        let report = CrawlReport {
            seed,
            host: scheduler.scope().host().to_string(),
            started_at,
            elapsed: start.elapsed(),
            stop_reason,
            visited,
            stats: scheduler.stats().snapshot(),
            workers,
            active_workers: scheduler.board().active(),
        };

        tracing::info!(
            "Crawl {} after {:.2}s: {} visited, {} fetched, {} failed, {} dropped",
            report.stop_reason,
            report.elapsed.as_secs_f64(),
            report.visited.len(),
            report.stats.fetched,
            report.stats.failed,
            report.stats.dropped
        );

        Ok(report)
    }
}

/// Waits for every worker task to finish
async fn join_workers(pool: &mut JoinSet<()>) {
    while let Some(result) = pool.join_next().await {
        if let Err(e) = result {
            tracing::error!("Worker task failed: {}", e);
        }
    }
}

/// Joins the pool, cancelling `token` if `limit` elapses first
///
/// Returns `true` if the deadline fired.
async fn join_with_deadline(
    pool: &mut JoinSet<()>,
    token: &CancellationToken,
    limit: Duration,
) -> bool {
    let joined = join_workers(pool);
    tokio::pin!(joined);

    let deadline_hit = tokio::select! {
        _ = &mut joined => false,
        _ = tokio::time::sleep(limit) => true,
    };

    if deadline_hit {
        tracing::info!("Crawl deadline of {:?} reached, stopping workers", limit);
        token.cancel();
        joined.await;
    }

    deadline_hit
}
