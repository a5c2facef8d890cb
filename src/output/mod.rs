//! Output module for crawl statistics and reports
//!
//! This module handles:
//! - Live counters shared by the workers of a run
//! - Rendering finished runs as text or JSON

mod report;
mod stats;

pub use report::{
    format_text_report, print_report, render_report, write_report, ReportError, ReportFormat,
};
pub use stats::{CrawlStats, StatsSnapshot};
