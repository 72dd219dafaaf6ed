//! Raw data retrieval.
//!
//! A [`StatsSource`] hands back the four per-player record sets plus the hero
//! catalog as typed records. [`OpenDotaClient`] talks to the public OpenDota
//! API; [`FixtureSource`] reads the same JSON documents from disk.

mod fixture;
mod retry;

pub use fixture::FixtureSource;
pub use retry::{with_retry, RetryPolicy};

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::models::{RawHeroEntry, RawHeroStat, RawMatch, RawPeer, RawProfile};

/// Errors that can occur during fetching.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid player id: {0:?}")]
    InvalidPlayerId(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rate limited by {host}, retry after {retry_after_secs}s")]
    RateLimited { host: String, retry_after_secs: u64 },

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FetchError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Http(e) => !e.is_builder(),
            FetchError::RateLimited { .. } => true,
            FetchError::HttpStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Player ids end up in URL paths and fixture paths.
pub fn validate_player_id(player_id: &str) -> Result<&str, FetchError> {
    let id = player_id.trim();
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(FetchError::InvalidPlayerId(player_id.to_string()));
    }
    Ok(id)
}

/// Seconds from a 429's `Retry-After` header, 60 when absent or not a number.
fn retry_after_secs(headers: &HeaderMap) -> u64 {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(60)
}

/// Source of raw player records.
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Source identifier for logging.
    fn name(&self) -> &'static str;

    async fn fetch_profile(&self, player_id: &str) -> Result<RawProfile, FetchError>;

    async fn fetch_matches(&self, player_id: &str) -> Result<Vec<RawMatch>, FetchError>;

    async fn fetch_hero_stats(&self, player_id: &str) -> Result<Vec<RawHeroStat>, FetchError>;

    async fn fetch_peers(&self, player_id: &str) -> Result<Vec<RawPeer>, FetchError>;

    /// Hero id to name reference table.
    async fn fetch_hero_catalog(&self) -> Result<Vec<RawHeroEntry>, FetchError>;
}

/// Configuration for the OpenDota client.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// API root, e.g. `https://api.opendota.com/api/`
    pub base_url: Url,

    /// Per-request timeout
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,

    /// Retry policy applied to every request
    pub retry: RetryPolicy,

    /// Include matches OpenDota flags as insignificant (turbo, event modes...)
    pub include_insignificant: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("https://api.opendota.com/api/").expect("static URL is valid"),
            timeout: Duration::from_secs(30),
            user_agent: concat!("dota-dashboard/", env!("CARGO_PKG_VERSION")).to_string(),
            retry: RetryPolicy::default(),
            include_insignificant: true,
        }
    }
}

/// HTTP client for the OpenDota API.
pub struct OpenDotaClient {
    client: Client,
    config: FetcherConfig,
}

impl OpenDotaClient {
    /// Create a new client with the given configuration.
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("dota-dashboard")),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a client with default configuration.
    pub fn with_defaults() -> Result<Self, FetchError> {
        Self::new(FetcherConfig::default())
    }

    /// Build an endpoint URL from path segments below the API root.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.config.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn player_endpoint(&self, player_id: &str, resource: Option<&str>) -> Result<Url, FetchError> {
        let id = validate_player_id(player_id)?;
        match resource {
            Some(resource) => self.endpoint(&["players", id, resource]),
            None => self.endpoint(&["players", id]),
        }
    }

    fn matches_endpoint(&self, player_id: &str) -> Result<Url, FetchError> {
        let mut url = self.player_endpoint(player_id, Some("matches"))?;
        if self.config.include_insignificant {
            url.query_pairs_mut().append_pair("significant", "0");
        }
        Ok(url)
    }

    /// GET a JSON document, retrying per the configured policy.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        with_retry(&self.config.retry, url.as_str(), || self.get_json_once(&url)).await
    }

    async fn get_json_once<T: DeserializeOwned>(&self, url: &Url) -> Result<T, FetchError> {
        debug!("Fetching {}", url);

        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited {
                host: url.host_str().unwrap_or("unknown").to_string(),
                retry_after_secs: retry_after_secs(response.headers()),
            });
        }

        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl StatsSource for OpenDotaClient {
    fn name(&self) -> &'static str {
        "opendota"
    }

    async fn fetch_profile(&self, player_id: &str) -> Result<RawProfile, FetchError> {
        self.get_json(self.player_endpoint(player_id, None)?).await
    }

    async fn fetch_matches(&self, player_id: &str) -> Result<Vec<RawMatch>, FetchError> {
        self.get_json(self.matches_endpoint(player_id)?).await
    }

    async fn fetch_hero_stats(&self, player_id: &str) -> Result<Vec<RawHeroStat>, FetchError> {
        self.get_json(self.player_endpoint(player_id, Some("heroes"))?)
            .await
    }

    async fn fetch_peers(&self, player_id: &str) -> Result<Vec<RawPeer>, FetchError> {
        self.get_json(self.player_endpoint(player_id, Some("peers"))?)
            .await
    }

    async fn fetch_hero_catalog(&self) -> Result<Vec<RawHeroEntry>, FetchError> {
        self.get_json(self.endpoint(&["heroStats"])?).await
    }
}
