//! hostcrawl: a bounded-concurrency, single-host web crawler
//!
//! Starting from a seed URL, a fixed pool of workers pulls URLs from a bounded
//! frontier, deduplicates them through an atomic visited set, fetches each
//! page once, and feeds same-host links back into the frontier until the run
//! is cancelled, hits its deadline, or runs out of work.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for crawl setup
///
/// Per-URL failures never surface here; they are logged and counted in the
/// run report. Only problems that prevent a run from starting are errors.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid seed URL: {0}")]
    InvalidSeed(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL '{url}': {source}")]
    Parse {
        url: String,
        source: ::url::ParseError,
    },

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlReport, Crawler, StopReason};
pub use state::WorkerState;
pub use crate::url::{in_scope, parse_seed, CrawlScope};
