//! HTTP fetch pipeline for the upstream source.
//!
//! ### Safety Gates
//! - Max redirects: 5
//! - Max body bytes: 5MB (configurable)
//!
//! ### robots.txt Compliance
//! - Fetch and cache `robots.txt` per host (24h cache).
//! - Evaluate `*` and current User-Agent.
//!
//! Every failure here is fatal to the calling run; there is no retry layer.

pub mod robots;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode, Url};

pub use robots::{RobotsCache, RobotsError};

use episearch_core::Error;

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "episearch/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,

    /// Whether to respect robots.txt (default: true)
    pub respect_robots: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "episearch/0.1".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(20000),
            max_redirects: 5,
            respect_robots: true,
        }
    }
}

/// Response from a fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The original URL requested
    pub url: Url,
    /// The final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: StatusCode,
    /// Response body bytes
    pub bytes: Bytes,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

impl FetchResponse {
    /// Response body decoded as text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Source of raw page markup.
///
/// The seam between the ingestion pipeline and HTTP, so pipeline tests can
/// supply canned pages.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the page at `url` and return its markup.
    async fn page(&self, url: &str) -> Result<String, Error>;
}

/// HTTP fetch client with politeness checks.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
    robots_cache: RobotsCache,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::UpstreamFetch(format!("failed to build HTTP client: {}", e)))?;

        let robots_cache = RobotsCache::new(config.user_agent.clone());

        Ok(Self { http, config, robots_cache })
    }

    /// Fetch a URL, returning raw bytes and metadata.
    ///
    /// Performs the robots.txt check and respects redirect/byte limits.
    pub async fn fetch(&self, url_str: &str) -> Result<FetchResponse, Error> {
        let start = Instant::now();
        let url = Url::parse(url_str).map_err(|e| Error::UpstreamFetch(format!("invalid url {url_str:?}: {e}")))?;

        if self.config.respect_robots {
            self.robots_cache
                .check(&url)
                .await
                .map_err(|e| Error::UpstreamFetch(e.to_string()))?;
        }

        let response = self
            .http
            .get(url.as_str())
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .send()
            .await
            .map_err(|e| Error::UpstreamFetch(format!("network error: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            return Err(Error::UpstreamFetch(format!("status {} fetching {}", status.as_u16(), url)));
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::UpstreamFetch(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let final_url = response.url().clone();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::UpstreamFetch(format!("failed to read response: {}", e)))?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::UpstreamFetch(format!(
                "{} bytes exceeds {}",
                bytes.len(),
                self.config.max_bytes
            )));
        }

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            "fetched {} -> {} in {}ms ({} bytes)",
            url,
            final_url,
            fetch_ms,
            bytes.len()
        );

        Ok(FetchResponse { url, final_url, status, bytes, fetch_ms })
    }

    /// Get reference to the robots cache.
    pub fn robots_cache(&self) -> &RobotsCache {
        &self.robots_cache
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[async_trait]
impl PageSource for FetchClient {
    async fn page(&self, url: &str) -> Result<String, Error> {
        Ok(self.fetch(url).await?.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.user_agent, "episearch/0.1");
        assert_eq!(config.max_bytes, 5 * 1024 * 1024);
        assert_eq!(config.timeout, Duration::from_millis(20000));
        assert_eq!(config.max_redirects, 5);
        assert!(config.respect_robots);
    }

    #[test]
    fn test_fetch_response_text() {
        let response = FetchResponse {
            url: Url::parse("https://example.com").unwrap(),
            final_url: Url::parse("https://example.com").unwrap(),
            status: StatusCode::OK,
            bytes: Bytes::from_static("本文".as_bytes()),
            fetch_ms: 100,
        };

        assert_eq!(response.text(), "本文");
    }

    #[tokio::test]
    async fn test_fetch_client_new() {
        let config = FetchConfig::default();
        let client = FetchClient::new(config);
        assert!(client.is_ok());
    }
}
