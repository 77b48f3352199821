//! Configuration management for the ilgwa service
//!
//! This module handles loading and validating configuration from environment
//! variables, files, and command-line arguments.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default number of recent contests scanned before a generation gives up
pub const DEFAULT_CONTEST_WINDOW: usize = 100;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Contest archive client configuration
    pub archive: ArchiveConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Daily generation configuration
    pub generator: GeneratorConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Contest archive client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Base URL of the archive query API
    pub base_url: String,

    /// Minimum spacing between outbound calls in milliseconds
    pub min_interval_ms: u64,

    /// TTL for cached responses in seconds
    pub cache_ttl_secs: u64,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// User agent string
    pub user_agent: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database path
    pub sqlite_path: PathBuf,
}

/// Daily generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// How many recent contests to scan before declaring the pool exhausted
    pub contest_window: usize,

    /// Only contests that started within this many days are considered
    pub recency_days: i64,

    /// Page size requested from the submission history endpoint
    pub submission_page_size: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("ILGWA_ARCHIVE_URL")
            .unwrap_or_else(|_| String::from("https://codeforces.com/api"));

        let min_interval_ms = std::env::var("ILGWA_MIN_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(2000);

        let cache_ttl_secs = std::env::var("ILGWA_CACHE_TTL")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(300);

        let request_timeout_secs = std::env::var("ILGWA_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(10);

        let user_agent = std::env::var("ILGWA_USER_AGENT")
            .unwrap_or_else(|_| format!("ilgwa/{}", env!("CARGO_PKG_VERSION")));

        let sqlite_path = std::env::var("ILGWA_SQLITE_PATH")
            .unwrap_or_else(|_| String::from("data/ilgwa.db"))
            .into();

        let contest_window = std::env::var("ILGWA_CONTEST_WINDOW")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_CONTEST_WINDOW);

        let recency_days = std::env::var("ILGWA_RECENCY_DAYS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(180);

        let submission_page_size = std::env::var("ILGWA_SUBMISSION_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10_000);

        let log_level = std::env::var("ILGWA_LOG_LEVEL").unwrap_or_else(|_| String::from("info"));

        let log_format = std::env::var("ILGWA_LOG_FORMAT").unwrap_or_else(|_| String::from("text"));

        Ok(Self {
            archive: ArchiveConfig {
                base_url,
                min_interval_ms,
                cache_ttl_secs,
                request_timeout_secs,
                user_agent,
            },
            database: DatabaseConfig { sqlite_path },
            generator: GeneratorConfig {
                contest_window,
                recency_days,
                submission_page_size,
            },
            logging: LoggingConfig {
                level: log_level,
                format: log_format,
            },
        })
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.archive.base_url.is_empty() {
            anyhow::bail!("archive.base_url must not be empty");
        }

        if self.archive.min_interval_ms == 0 {
            anyhow::bail!("archive.min_interval_ms must be greater than 0");
        }

        if self.archive.request_timeout_secs == 0 {
            anyhow::bail!("archive.request_timeout_secs must be greater than 0");
        }

        if self.generator.contest_window == 0 {
            anyhow::bail!("generator.contest_window must be greater than 0");
        }

        if self.generator.recency_days <= 0 {
            anyhow::bail!("generator.recency_days must be positive");
        }

        Ok(())
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.archive.request_timeout_secs)
    }

    /// Get minimum call spacing as Duration
    #[must_use]
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.archive.min_interval_ms)
    }

    /// Get cache TTL as Duration
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.archive.cache_ttl_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            archive: ArchiveConfig {
                base_url: String::from("https://codeforces.com/api"),
                min_interval_ms: 2000,
                cache_ttl_secs: 300,
                request_timeout_secs: 10,
                user_agent: format!("ilgwa/{}", env!("CARGO_PKG_VERSION")),
            },
            database: DatabaseConfig {
                sqlite_path: PathBuf::from("data/ilgwa.db"),
            },
            generator: GeneratorConfig {
                contest_window: DEFAULT_CONTEST_WINDOW,
                recency_days: 180,
                submission_page_size: 10_000,
            },
            logging: LoggingConfig {
                level: String::from("info"),
                format: String::from("text"),
            },
        }
    }
}
