//! robots.txt compliance with caching.
//!
//! Fetches and caches robots.txt files per-host, respecting a 24-hour TTL.
//! A disallowed path is an error: the ingestion throttle exists for upstream
//! politeness, and robots compliance is part of the same contract.

use robotstxt_rs::RobotsTxt;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use url::Url;

/// TTL for cached robots.txt entries (24 hours).
const ROBOTS_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Maximum size of robots.txt to fetch (1MB).
const MAX_ROBOTS_SIZE: usize = 1024 * 1024;

/// Error type for robots.txt operations.
#[derive(Debug, thiserror::Error)]
pub enum RobotsError {
    #[error("robots.txt disallowed: {path} (robots_url: {robots_url})")]
    Disallowed { path: String, robots_url: String },

    #[error("failed to fetch robots.txt: {0}")]
    FetchError(String),

    #[error("robots.txt too large")]
    TooLarge,
}

/// Cached robots.txt entry with timestamp.
struct CachedRobots {
    robots: RobotsTxt,
    fetched_at: Instant,
}

impl CachedRobots {
    fn is_expired(&self) -> bool {
        self.fetched_at.elapsed() > ROBOTS_TTL
    }
}

/// In-memory cache for robots.txt files, keyed by robots URL.
pub struct RobotsCache {
    entries: RwLock<HashMap<String, CachedRobots>>,
    user_agent: String,
    http: reqwest::Client,
}

impl RobotsCache {
    /// Create a new robots.txt cache.
    pub fn new(user_agent: String) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            user_agent,
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    /// Check that a URL is allowed by its host's robots.txt.
    ///
    /// Fetches and caches robots.txt for the host on a miss or an expired
    /// entry. Disallowed paths return `RobotsError::Disallowed`.
    pub async fn check(&self, url: &Url) -> Result<(), RobotsError> {
        let robots_url = format!("{}://{}/robots.txt", url.scheme(), url.host_str().unwrap_or(""));

        let cached = {
            let entries = self.entries.read().await;
            entries
                .get(&robots_url)
                .filter(|entry| !entry.is_expired())
                .map(|entry| entry.robots.can_fetch(&self.user_agent, url.as_str()))
        };

        let allowed = match cached {
            Some(allowed) => {
                tracing::debug!("robots.txt cache hit for {}: {}", robots_url, allowed);
                allowed
            }
            None => {
                let robots = self.fetch_robots(&robots_url).await?;
                let allowed = robots.can_fetch(&self.user_agent, url.as_str());
                let mut entries = self.entries.write().await;
                entries.insert(robots_url.clone(), CachedRobots { robots, fetched_at: Instant::now() });
                allowed
            }
        };

        if !allowed {
            return Err(RobotsError::Disallowed { path: url.path().to_string(), robots_url });
        }

        Ok(())
    }

    /// Fetch robots.txt from the given URL.
    async fn fetch_robots(&self, url: &str) -> Result<RobotsTxt, RobotsError> {
        let response = self
            .http
            .get(url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| RobotsError::FetchError(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            if let Some(len) = response.content_length()
                && len as usize > MAX_ROBOTS_SIZE
            {
                return Err(RobotsError::TooLarge);
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|e| RobotsError::FetchError(e.to_string()))?;

            if bytes.len() > MAX_ROBOTS_SIZE {
                return Err(RobotsError::TooLarge);
            }

            let content = String::from_utf8_lossy(&bytes);
            Ok(RobotsTxt::parse(&content))
        } else if status.is_client_error() {
            tracing::debug!("robots.txt not found for {}, allowing all", url);
            Ok(RobotsTxt::parse(""))
        } else {
            Err(RobotsError::FetchError(format!("status {}", status)))
        }
    }

    /// Clear expired entries from the cache.
    pub async fn cleanup_expired(&self) {
        let mut entries = self.entries.write().await;
        entries.retain(|_, cached| !cached.is_expired());
    }
}
