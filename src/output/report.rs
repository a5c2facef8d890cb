//! Run report rendering
//!
//! A finished [`CrawlReport`] can be rendered as a plain-text summary for
//! humans or as JSON for scripts, and either printed or written to a file.

use crate::crawler::CrawlReport;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while emitting a report
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Output format for a run report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Renders a report in the requested format
pub fn render_report(report: &CrawlReport, format: ReportFormat) -> Result<String, ReportError> {
    match format {
        ReportFormat::Text => Ok(format_text_report(report)),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}

/// Prints a report to stdout
pub fn print_report(report: &CrawlReport, format: ReportFormat) -> Result<(), ReportError> {
    let rendered = render_report(report, format)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    if !rendered.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    Ok(())
}

/// Writes a report to `output_path`, replacing any existing file
///
/// # Arguments
///
/// * `report` - The finished run
/// * `format` - Text or JSON
/// * `output_path` - Destination file
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(ReportError)` - Failed to serialize or write
pub fn write_report(
    report: &CrawlReport,
    format: ReportFormat,
    output_path: &Path,
) -> Result<(), ReportError> {
    let rendered = render_report(report, format)?;

    let mut file = File::create(output_path)?;
    file.write_all(rendered.as_bytes())?;

    Ok(())
}

/// Formats a report as a plain-text summary
pub fn format_text_report(report: &CrawlReport) -> String {
    let mut out = String::new();
    let stats = &report.stats;

    out.push_str("=== Crawl Report ===\n\n");

    out.push_str(&format!("Seed: {}\n", report.seed));
    out.push_str(&format!("Host: {}\n", report.host));
    out.push_str(&format!("Started: {}\n", report.started_at.to_rfc3339()));
    out.push_str(&format!(
        "Elapsed: {:.2}s\n",
        report.elapsed.as_secs_f64()
    ));
    out.push_str(&format!("Stopped: {}\n", report.stop_reason));
    out.push_str(&format!("Workers: {}\n\n", report.workers));

    out.push_str("Pages:\n");
    out.push_str(&format!("  Visited: {}\n", report.visited.len()));
    out.push_str(&format!("  Fetched: {}\n", stats.fetched));
    out.push_str(&format!("  Failed: {}\n", stats.failed));
    out.push_str(&format!("  Non-HTML: {}\n\n", stats.non_html));

    out.push_str("Links:\n");
    out.push_str(&format!("  Found: {}\n", stats.links_found));
    out.push_str(&format!("  Queued: {}\n", stats.queued));
    out.push_str(&format!("  Already visited: {}\n", stats.duplicates));
    out.push_str(&format!("  Out of scope: {}\n", stats.out_of_scope));
    out.push_str(&format!("  Dropped (frontier full): {}\n", stats.dropped));

    if !report.visited.is_empty() {
        out.push_str(&format!("\nVisited URLs ({}):\n", report.visited.len()));
        for url in &report.visited {
            out.push_str(&format!("  - {}\n", url));
        }
    }

    out
}
