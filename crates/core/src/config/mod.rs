//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (EPISEARCH_*)
//! 2. TOML config file (if EPISEARCH_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (EPISEARCH_*)
/// 2. TOML config file (if EPISEARCH_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Root URLs of the works to ingest.
    ///
    /// Set via EPISEARCH_WORK_URLS environment variable (comma-separated).
    /// Required only when the ingestion pipeline runs.
    #[serde(default)]
    pub work_urls: Vec<String>,

    /// Percentage of each work's newest episodes to re-ingest.
    ///
    /// Set via EPISEARCH_TARGET_RATE environment variable.
    #[serde(default = "default_target_rate")]
    pub target_rate: u8,

    /// Pause between successive episode fetches in milliseconds.
    ///
    /// Set via EPISEARCH_FETCH_DELAY_MS environment variable.
    #[serde(default = "default_fetch_delay_ms")]
    pub fetch_delay_ms: u64,

    /// Path to the SQLite archive database.
    ///
    /// Set via EPISEARCH_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via EPISEARCH_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to fetch per request.
    ///
    /// Set via EPISEARCH_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via EPISEARCH_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Whether to respect robots.txt rules.
    ///
    /// Set via EPISEARCH_RESPECT_ROBOTS environment variable.
    #[serde(default = "default_true")]
    pub respect_robots: bool,

    /// Records requested per scan page.
    ///
    /// Set via EPISEARCH_SCAN_PAGE_SIZE environment variable.
    #[serde(default = "default_scan_page_size")]
    pub scan_page_size: usize,
}

fn default_target_rate() -> u8 {
    5
}

fn default_fetch_delay_ms() -> u64 {
    500
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./episearch.sqlite")
}

fn default_user_agent() -> String {
    "episearch/0.1".into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_scan_page_size() -> usize {
    250
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            work_urls: Vec::new(),
            target_rate: default_target_rate(),
            fetch_delay_ms: default_fetch_delay_ms(),
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
            respect_robots: true,
            scan_page_size: default_scan_page_size(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Inter-fetch pause as Duration.
    pub fn fetch_delay(&self) -> Duration {
        Duration::from_millis(self.fetch_delay_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `EPISEARCH_`
    /// 2. TOML file from `EPISEARCH_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("EPISEARCH_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("EPISEARCH_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check that work URLs are configured (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if no work URLs are set.
    pub fn require_work_urls(&self) -> Result<&[String], ConfigError> {
        if self.work_urls.is_empty() {
            return Err(ConfigError::Missing {
                field: "work_urls".into(),
                hint: "Set EPISEARCH_WORK_URLS environment variable".into(),
            });
        }
        Ok(&self.work_urls)
    }
}
