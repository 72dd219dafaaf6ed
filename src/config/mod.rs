//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::calculate::{TOP_HEROES, TOP_PEERS};
use crate::fetch::{FetcherConfig, RetryPolicy};
use crate::transform::UnknownHeroPolicy;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Stats API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API root URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Deadline for fetching all four record sets, in seconds
    #[serde(default = "default_deadline")]
    pub deadline_seconds: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Retries per request after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// First backoff delay in milliseconds
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,

    /// Backoff growth factor
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Longest single backoff in milliseconds
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,

    /// Include matches the API flags as insignificant
    #[serde(default = "default_include_insignificant")]
    pub include_insignificant: bool,
}

fn default_base_url() -> String {
    "https://api.opendota.com/api/".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_deadline() -> u64 {
    60
}

fn default_user_agent() -> String {
    concat!("dota-dashboard/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_delay() -> u64 {
    500
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_max_delay() -> u64 {
    10_000
}

fn default_include_insignificant() -> bool {
    true
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            deadline_seconds: default_deadline(),
            user_agent: default_user_agent(),
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            max_delay_ms: default_max_delay(),
            include_insignificant: default_include_insignificant(),
        }
    }
}

impl ApiConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            initial_delay_ms: self.initial_delay_ms,
            backoff_multiplier: self.backoff_multiplier,
            max_delay_ms: self.max_delay_ms,
        }
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_seconds)
    }

    /// Build the HTTP client configuration.
    pub fn fetcher_config(&self) -> Result<FetcherConfig, ConfigError> {
        let base_url = Url::parse(&self.base_url).map_err(|e| {
            ConfigError::ValidationError(format!("Invalid API base URL {:?}: {}", self.base_url, e))
        })?;

        Ok(FetcherConfig {
            base_url,
            timeout: Duration::from_secs(self.timeout_seconds),
            user_agent: self.user_agent.clone(),
            retry: self.retry_policy(),
            include_insignificant: self.include_insignificant,
        })
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8050
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Heroes in each top-hero chart
    #[serde(default = "default_top_heroes")]
    pub top_heroes: usize,

    /// Teammates in each friend chart
    #[serde(default = "default_top_peers")]
    pub top_peers: usize,

    /// Placeholder name or hard failure for unknown hero ids
    #[serde(default)]
    pub unknown_hero_policy: UnknownHeroPolicy,
}

fn default_top_heroes() -> usize {
    TOP_HEROES
}

fn default_top_peers() -> usize {
    TOP_PEERS
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_heroes: default_top_heroes(),
            top_peers: default_top_peers(),
            unknown_hero_policy: UnknownHeroPolicy::default(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "API timeout must be greater than 0".to_string(),
            ));
        }

        if self.api.deadline_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "API deadline must be greater than 0".to_string(),
            ));
        }

        if self.api.backoff_multiplier < 1.0 {
            return Err(ConfigError::ValidationError(
                "Backoff multiplier must be at least 1.0".to_string(),
            ));
        }

        self.api.fetcher_config()?;

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
