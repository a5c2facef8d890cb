//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The bounded frontier queue and the atomic visited set
//! - HTTP fetching behind the [`Fetcher`] trait
//! - HTML parsing and link extraction behind the [`LinkExtractor`] trait
//! - The worker pool and the overall run coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod scheduler;
mod visited;

pub use coordinator::{CrawlReport, Crawler, StopReason};
pub use fetcher::{build_http_client, FetchError, FetchedPage, Fetcher, HttpFetcher};
pub use frontier::{Frontier, PushError, DEFAULT_CAPACITY};
pub use parser::{is_html, parse_html, HtmlLinkExtractor, LinkExtractor, ParsedPage};
pub use scheduler::{PendingWork, Scheduler};
pub use visited::VisitedSet;

use crate::config::Config;
use crate::CrawlError;
use tokio_util::sync::CancellationToken;

/// Runs a complete crawl from the configured seed
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the configuration and build the HTTP client
/// 2. Validate the seed (from the config, or the compiled-in default)
/// 3. Run the worker pool until exhaustion, cancellation or the deadline
/// 4. Return the run report
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `cancel` - Cancelling this token stops the crawl
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The run finished (for any [`StopReason`])
/// * `Err(CrawlError)` - The run could not start
pub async fn crawl(config: Config, cancel: &CancellationToken) -> Result<CrawlReport, CrawlError> {
    let seed = config.crawler.seed_or_default().to_string();
    Crawler::new(config)?.run(&seed, cancel).await
}
