//! URL handling module for hostcrawl
//!
//! This module provides seed validation, link resolution, and the crawl
//! scope (same-host) filter.
//!
//! URLs are compared by the exact string the `url` crate produces when it
//! parses or resolves them. Nothing else is normalized: `/a` and `/a/`, or
//! `/a` and `/a#top`, are different URLs to the crawler.

mod domain;
mod resolve;

use crate::UrlError;
use url::Url;

// Re-export main functions
pub use domain::{extract_host, in_scope, CrawlScope};
pub use resolve::{is_crawlable_scheme, resolve_link};

/// Parses and validates a seed URL
///
/// The seed must be absolute, use http or https, and have a host.
///
/// # Examples
///
/// ```
/// use hostcrawl::url::parse_seed;
///
/// let seed = parse_seed("https://example.com").unwrap();
/// assert_eq!(seed.as_str(), "https://example.com/");
/// assert!(parse_seed("example.com").is_err());
/// ```
pub fn parse_seed(seed: &str) -> Result<Url, UrlError> {
    let url = Url::parse(seed).map_err(|source| UrlError::Parse {
        url: seed.to_string(),
        source,
    })?;

    if !is_crawlable_scheme(&url) {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost(seed.to_string()));
    }

    Ok(url)
}
