//! Retrying fetcher
//!
//! Provides a fetcher that handles:
//! - Automatic retries with exponential backoff
//! - Server-directed waits on 429
//! - Response body parsing
//! - Error classification for retry decisions

use super::request::PageRequest;
use super::retry::{classify, classify_failure, Backoff, RetryPolicy, RetryState};
use super::sleep::{Sleeper, TokioSleeper};
use super::transport::{ReqwestTransport, Transport};
use crate::error::Result;
use crate::types::JsonValue;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the fetcher
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Per-request timeout
    pub timeout: Duration,
    /// Default retry policy
    pub retry: RetryPolicy,
    /// User agent string
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(20),
            retry: RetryPolicy::default(),
            user_agent: format!("mubi-export/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl FetcherConfig {
    /// Create a new config builder
    pub fn builder() -> FetcherConfigBuilder {
        FetcherConfigBuilder::default()
    }
}

/// Builder for fetcher config
#[derive(Default)]
pub struct FetcherConfigBuilder {
    config: FetcherConfig,
}

impl FetcherConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the retry policy
    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.config.retry = policy;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> FetcherConfig {
        self.config
    }
}

/// Single-request GET with classification-driven retry and backoff
pub struct RetryingFetcher {
    transport: Arc<dyn Transport>,
    sleeper: Arc<dyn Sleeper>,
    config: FetcherConfig,
}

impl RetryingFetcher {
    /// Create a fetcher with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(FetcherConfig::default())
    }

    /// Create a fetcher over a `reqwest` transport that really sleeps
    pub fn with_config(config: FetcherConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config.user_agent)?;
        Ok(Self::with_parts(
            config,
            Arc::new(transport),
            Arc::new(TokioSleeper),
        ))
    }

    /// Create a fetcher from explicit parts
    pub fn with_parts(
        config: FetcherConfig,
        transport: Arc<dyn Transport>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            transport,
            sleeper,
            config,
        }
    }

    /// Replace the sleeper
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Sleeper shared with callers that throttle between requests
    pub fn sleeper(&self) -> &dyn Sleeper {
        self.sleeper.as_ref()
    }

    /// Fetch with the configured retry policy
    pub async fn fetch(&self, request: &PageRequest) -> Result<JsonValue> {
        self.fetch_with_policy(request, &self.config.retry).await
    }

    /// Fetch with an explicit retry policy
    pub async fn fetch_with_policy(
        &self,
        request: &PageRequest,
        policy: &RetryPolicy,
    ) -> Result<JsonValue> {
        let mut backoff = Backoff::new(policy);
        let mut state = RetryState::start();

        loop {
            state = match state {
                RetryState::Attempting { attempt } => {
                    debug!(
                        "GET {} cursor={:?} attempt {}/{}",
                        request.url, request.cursor, attempt, policy.max_attempts
                    );
                    let outcome = match self.transport.get(request, self.config.timeout).await {
                        Ok(response) => classify(response),
                        Err(e) => classify_failure(e),
                    };
                    RetryState::after_attempt(attempt, outcome, policy, &mut backoff)
                }
                RetryState::Waiting {
                    delay,
                    next_attempt,
                    reason,
                } => {
                    warn!(
                        "{reason}; attempt {}/{}, retrying in {:?}",
                        next_attempt - 1,
                        policy.max_attempts,
                        delay
                    );
                    self.sleeper.sleep(delay).await;
                    RetryState::Attempting {
                        attempt: next_attempt,
                    }
                }
                RetryState::Succeeded(body) => return Ok(body),
                RetryState::FailedTerminal(error) => return Err(error),
            };
        }
    }
}

impl std::fmt::Debug for RetryingFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryingFetcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
