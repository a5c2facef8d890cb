use serde::Deserialize;
use std::time::Duration;

/// Seed used when neither the command line nor the config file names one
pub const DEFAULT_SEED: &str = "https://example.com/";

/// Wall-clock cap for a run when the config file does not set one
pub const DEFAULT_MAX_DURATION_MS: u64 = 10_000;

/// Main configuration structure for hostcrawl
///
/// Every section is optional; an empty file yields [`Config::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Number of concurrent workers
    pub workers: usize,

    /// Maximum number of URLs waiting in the frontier
    #[serde(rename = "queue-capacity")]
    pub queue_capacity: usize,

    /// Per-request timeout (milliseconds)
    #[serde(rename = "fetch-timeout-ms")]
    pub fetch_timeout_ms: u64,

    /// Wall-clock cap for a whole run (milliseconds)
    #[serde(rename = "max-duration-ms")]
    pub max_duration_ms: Option<u64>,

    /// Seed URL used when none is given on the command line
    pub seed: Option<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: 5,
            queue_capacity: 100,
            fetch_timeout_ms: 10_000,
            max_duration_ms: Some(DEFAULT_MAX_DURATION_MS),
            seed: None,
        }
    }
}

impl CrawlerConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn max_duration(&self) -> Option<Duration> {
        self.max_duration_ms.map(Duration::from_millis)
    }

    /// The configured seed, falling back to [`DEFAULT_SEED`]
    pub fn seed_or_default(&self) -> &str {
        self.seed.as_deref().unwrap_or(DEFAULT_SEED)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.crawler.workers, 5);
        assert_eq!(config.crawler.queue_capacity, 100);
        assert_eq!(config.crawler.fetch_timeout(), Duration::from_secs(10));
        assert_eq!(config.crawler.max_duration(), Some(Duration::from_secs(10)));
        assert_eq!(config.crawler.seed_or_default(), DEFAULT_SEED);
    }

    #[test]
    fn test_user_agent_header() {
        let mut ua = UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: None,
        };
        assert_eq!(ua.header_value(), "TestBot/1.0");

        ua.contact_url = Some("https://example.com/bot".to_string());
        assert_eq!(ua.header_value(), "TestBot/1.0 (+https://example.com/bot)");
    }
}
