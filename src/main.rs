//! hostcrawl main entry point
//!
//! This is the command-line interface for the hostcrawl single-host crawler.

use anyhow::Context;
use clap::Parser;
use hostcrawl::config::{apply_overrides, load_config_with_hash, Config, Overrides};
use hostcrawl::output::{print_report, write_report, ReportFormat};
use hostcrawl::Crawler;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// hostcrawl: a bounded-concurrency, single-host web crawler
///
/// Crawls every page reachable from SEED without leaving its host, using a
/// fixed pool of workers and a bounded queue. Stops when there is nothing left
/// to fetch, when --timeout elapses, or on Ctrl-C / SIGTERM.
#[derive(Parser, Debug)]
#[command(name = "hostcrawl")]
#[command(version)]
#[command(about = "A bounded-concurrency, single-host web crawler", long_about = None)]
struct Cli {
    /// Seed URL (defaults to the config file's seed, then https://example.com/)
    #[arg(value_name = "SEED")]
    seed: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Stop the crawl after this many seconds (default 10)
    #[arg(short, long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Number of concurrent workers
    #[arg(short, long, value_name = "N")]
    workers: Option<usize>,

    /// Maximum number of URLs waiting in the frontier
    #[arg(long, value_name = "N")]
    queue_capacity: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    fetch_timeout: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Also write the report to this file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            seed: self.seed.clone(),
            workers: self.workers,
            queue_capacity: self.queue_capacity,
            fetch_timeout_ms: self.fetch_timeout.map(|secs| secs.saturating_mul(1000)),
            max_duration_ms: self.timeout.map(|secs| secs.saturating_mul(1000)),
        }
    }

    fn report_format(&self) -> ReportFormat {
        if self.json {
            ReportFormat::Json
        } else {
            ReportFormat::Text
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_settings(&cli)?;
    let seed = config.crawler.seed_or_default().to_string();

    tracing::info!(
        "Workers: {}, queue capacity: {}, fetch timeout: {}ms",
        config.crawler.workers,
        config.crawler.queue_capacity,
        config.crawler.fetch_timeout_ms
    );
    if let Some(limit) = config.crawler.max_duration() {
        tracing::info!("Crawl will stop after {:?}", limit);
    }

    let crawler = Crawler::new(config).context("Failed to set up crawler")?;

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_signal(cancel.clone()));

    let report = crawler
        .run(&seed, &cancel)
        .await
        .with_context(|| format!("Cannot crawl {}", seed))?;

    let format = cli.report_format();
    print_report(&report, format).context("Failed to print report")?;
    if let Some(path) = &cli.output {
        write_report(&report, format, path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        tracing::info!("Report written to: {}", path.display());
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("hostcrawl=info,warn"),
            1 => EnvFilter::new("hostcrawl=debug,info"),
            2 => EnvFilter::new("hostcrawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and layers the command-line flags on top
fn load_settings(cli: &Cli) -> anyhow::Result<Config> {
    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    apply_overrides(config, &cli.overrides()).context("Invalid command-line options")
}

/// Cancels `cancel` on the first Ctrl-C or SIGTERM
async fn cancel_on_signal(cancel: CancellationToken) {
    match shutdown_signal().await {
        Ok(name) => {
            tracing::info!("Received {}, stopping crawl", name);
            cancel.cancel();
        }
        Err(e) => tracing::error!("Failed to listen for shutdown signals: {}", e),
    }
}

#[cfg(unix)]
async fn shutdown_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result.map(|()| "SIGINT"),
        _ = terminate.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await.map(|()| "Ctrl-C")
}
