use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Values supplied on the command line that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub seed: Option<String>,
    pub workers: Option<usize>,
    pub queue_capacity: Option<usize>,
    pub fetch_timeout_ms: Option<u64>,
    pub max_duration_ms: Option<u64>,
}

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use hostcrawl::config::load_config;
///
/// let config = load_config(Path::new("hostcrawl.toml")).unwrap();
/// println!("Workers: {}", config.crawler.workers);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so that the settings behind a run can be identified.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

/// Applies command-line overrides and re-validates the result
pub fn apply_overrides(mut config: Config, overrides: &Overrides) -> Result<Config, ConfigError> {
    if let Some(seed) = &overrides.seed {
        config.crawler.seed = Some(seed.clone());
    }
    if let Some(workers) = overrides.workers {
        config.crawler.workers = workers;
    }
    if let Some(capacity) = overrides.queue_capacity {
        config.crawler.queue_capacity = capacity;
    }
    if let Some(timeout) = overrides.fetch_timeout_ms {
        config.crawler.fetch_timeout_ms = timeout;
    }
    if let Some(limit) = overrides.max_duration_ms {
        config.crawler.max_duration_ms = Some(limit);
    }

    validate(&config)?;
    Ok(config)
}
