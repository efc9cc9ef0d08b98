//! Export configuration
//!
//! All tunables of a run: API location, page size, retry policy, the client
//! header values sent with every page request, and fallback endpoints.
//! Loaded from YAML; every field has a default so an empty file is valid.

use crate::error::{Error, Result};
use crate::http::{FetcherConfig, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete export configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Base URL; requests go to `{base_url}/{user_id}/{endpoint}`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Items requested per page
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Value of the `client-country` header
    #[serde(default = "default_country")]
    pub country: String,

    /// Directory the CSV tables are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Delay between consecutive page requests, in milliseconds
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,

    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpSettings,

    /// Client identification headers
    #[serde(default)]
    pub client: ClientSettings,

    /// Alternate endpoints per collection
    #[serde(default)]
    pub fallbacks: FallbackSettings,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            per_page: default_per_page(),
            country: default_country(),
            output_dir: default_output_dir(),
            page_delay_ms: default_page_delay_ms(),
            http: HttpSettings::default(),
            client: ClientSettings::default(),
            fallbacks: FallbackSettings::default(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.mubi.com/v4/users".to_string()
}

fn default_per_page() -> u32 {
    24
}

fn default_country() -> String {
    "NL".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_page_delay_ms() -> u64 {
    50
}

impl ExportConfig {
    /// Load a config from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse a config from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the fetcher or paginator cannot work with
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.base_url)
            .map_err(|e| Error::invalid_value("base_url", e.to_string()))?;

        if self.per_page == 0 {
            return Err(Error::invalid_value("per_page", "must be at least 1"));
        }
        if self.country.trim().is_empty() {
            return Err(Error::invalid_value("country", "must not be empty"));
        }

        let retry = &self.http.retry;
        if retry.max_attempts == 0 {
            return Err(Error::invalid_value(
                "http.retry.max_attempts",
                "must be at least 1",
            ));
        }
        if !retry.initial_backoff_secs.is_finite() || retry.initial_backoff_secs < 0.0 {
            return Err(Error::invalid_value(
                "http.retry.initial_backoff_secs",
                "must be a non-negative number",
            ));
        }
        if !retry.backoff_multiplier.is_finite() || retry.backoff_multiplier < 1.0 {
            return Err(Error::invalid_value(
                "http.retry.backoff_multiplier",
                "must be at least 1.0",
            ));
        }
        if self.http.timeout_secs == 0 {
            return Err(Error::invalid_value("http.timeout_secs", "must be at least 1"));
        }
        Ok(())
    }

    /// Retry policy derived from the `http.retry` section
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.http.retry.max_attempts,
            Duration::try_from_secs_f64(self.http.retry.initial_backoff_secs).unwrap_or_default(),
            self.http.retry.backoff_multiplier,
        )
    }

    /// Fetcher configuration derived from the `http` section
    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig::builder()
            .timeout(Duration::from_secs(self.http.timeout_secs))
            .retry(self.retry_policy())
            .user_agent(self.http.user_agent.clone())
            .build()
    }

    /// Politeness delay between pages
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}

// ============================================================================
// HTTP Settings
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Retry policy
    #[serde(default)]
    pub retry: RetrySettings,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            retry: RetrySettings::default(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_user_agent() -> String {
    format!("mubi-export/{}", env!("CARGO_PKG_VERSION"))
}

/// Retry policy settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Attempts per request, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Wait before the first retry, in seconds
    #[serde(default = "default_initial_backoff_secs")]
    pub initial_backoff_secs: f64,

    /// Growth factor applied after each transient failure
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_secs: default_initial_backoff_secs(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

fn default_max_attempts() -> u32 {
    4
}

fn default_initial_backoff_secs() -> f64 {
    1.0
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

// ============================================================================
// Client Settings
// ============================================================================

/// Header values identifying the client to the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Value of the `client` header
    #[serde(default = "default_client_tag")]
    pub client_tag: String,

    /// Value of the `Accept` header
    #[serde(default = "default_accept")]
    pub accept: String,

    /// Value of the `Accept-Encoding` header
    #[serde(default = "default_accept_encoding")]
    pub accept_encoding: String,

    /// Value of the `Accept-Language` header
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// Value of the `Referer` header
    #[serde(default = "default_site")]
    pub referer: String,

    /// Value of the `Origin` header
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Value of the `DNT` header
    #[serde(default = "default_dnt")]
    pub dnt: String,

    /// Value of the `client-accept-audio-codecs` header (omitted when empty)
    #[serde(default = "default_audio_codecs")]
    pub audio_codecs: String,

    /// Value of the `client-accept-video-codecs` header (omitted when empty)
    #[serde(default = "default_video_codecs")]
    pub video_codecs: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            client_tag: default_client_tag(),
            accept: default_accept(),
            accept_encoding: default_accept_encoding(),
            accept_language: default_accept_language(),
            referer: default_site(),
            origin: default_origin(),
            dnt: default_dnt(),
            audio_codecs: default_audio_codecs(),
            video_codecs: default_video_codecs(),
        }
    }
}

fn default_client_tag() -> String {
    "web".to_string()
}

fn default_accept() -> String {
    "*/*".to_string()
}

fn default_accept_encoding() -> String {
    "gzip, deflate, br, zstd".to_string()
}

fn default_accept_language() -> String {
    "en".to_string()
}

fn default_site() -> String {
    "https://mubi.com/".to_string()
}

fn default_origin() -> String {
    "https://mubi.com".to_string()
}

fn default_dnt() -> String {
    "1".to_string()
}

fn default_audio_codecs() -> String {
    "aac".to_string()
}

fn default_video_codecs() -> String {
    "h265,vp9,h264".to_string()
}

// ============================================================================
// Fallback Settings
// ============================================================================

/// Alternate endpoint names tried, in order, when a collection's primary
/// endpoint fails
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackSettings {
    /// Fallbacks for the watchlist (none by default)
    #[serde(default)]
    pub watchlist: Vec<String>,

    /// Fallbacks for ratings
    #[serde(default = "default_ratings_fallbacks")]
    pub ratings: Vec<String>,
}

impl Default for FallbackSettings {
    fn default() -> Self {
        Self {
            watchlist: Vec::new(),
            ratings: default_ratings_fallbacks(),
        }
    }
}

fn default_ratings_fallbacks() -> Vec<String> {
    vec!["marks".to_string(), "reviews".to_string(), "rated".to_string()]
}
