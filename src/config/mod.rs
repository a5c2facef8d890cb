//! Configuration module for hostcrawl
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so a crawl can run without any file at all.
//!
//! # Example
//!
//! ```no_run
//! use hostcrawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("hostcrawl.toml")).unwrap();
//! println!("Crawler will use {} workers", config.crawler.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, UserAgentConfig, DEFAULT_MAX_DURATION_MS, DEFAULT_SEED};
pub use validation::{validate, MAX_WORKERS};

// Re-export parser functions
pub use parser::{apply_overrides, compute_config_hash, load_config, load_config_with_hash, Overrides};
