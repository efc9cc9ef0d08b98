//! Error types for mubi-export
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use std::time::Duration;
use thiserror::Error;

/// Maximum number of body characters kept in HTTP error variants
pub const BODY_EXCERPT_LEN: usize = 400;

/// The main error type for mubi-export
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Fetch Errors
    // ============================================================================
    #[error("Transport error: {message}")]
    Transport { message: String, timed_out: bool },

    #[error("Client error {status}: {body}")]
    Client { status: u16, body: String },

    #[error("Invalid response body: {message}")]
    InvalidResponse { message: String },

    #[error("Rate limited (429){}", .retry_after.map(|d| format!(", retry after {}s", d.as_secs_f64())).unwrap_or_default())]
    RateLimited { retry_after: Option<Duration> },

    #[error("Server error {status}: {body}")]
    Server { status: u16, body: String },

    #[error("Request failed after {attempts} attempts: {last_error}")]
    RetryExhausted {
        attempts: u32,
        #[source]
        last_error: Box<Error>,
    },

    #[error("Pagination of '{endpoint}' failed: {source}")]
    Pagination {
        endpoint: String,
        #[source]
        source: Box<Error>,
    },

    // ============================================================================
    // Output Errors
    // ============================================================================
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Output error: {message}")]
    Output { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            timed_out: false,
        }
    }

    /// Create a client (4xx) error, truncating the body
    pub fn client(status: u16, body: &str) -> Self {
        Self::Client {
            status,
            body: excerpt(body),
        }
    }

    /// Create a server (5xx / unexpected status) error, truncating the body
    pub fn server(status: u16, body: &str) -> Self {
        Self::Server {
            status,
            body: excerpt(body),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Wrap an error that aborted a pagination sweep
    pub fn pagination(endpoint: impl Into<String>, source: Error) -> Self {
        Self::Pagination {
            endpoint: endpoint.into(),
            source: Box::new(source),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport { .. } | Error::RateLimited { .. } | Error::Server { .. } => true,
            _ => false,
        }
    }

    /// Innermost fetch error, looking through pagination and retry wrappers
    pub fn root(&self) -> &Error {
        match self {
            Error::Pagination { source, .. } => source.root(),
            Error::RetryExhausted { last_error, .. } => last_error.root(),
            other => other,
        }
    }

    /// Actionable guidance for the operator, if any applies
    pub fn hint(&self) -> Option<&'static str> {
        match self.root() {
            Error::Client {
                status: 401 | 403, ..
            } => Some("the API refused the request; supply a bearer token with --token"),
            Error::Client { status: 404, .. } => {
                Some("the collection was not found; check the user id, or try --token")
            }
            Error::Config { .. } | Error::InvalidConfigValue { .. } | Error::YamlParse(_) => None,
            Error::Csv(_) | Error::Output { .. } | Error::Io(_) => None,
            _ => Some("if this persists, re-run with --debug and/or --token <bearer token>"),
        }
    }
}

/// Truncate a response body for inclusion in an error
fn excerpt(body: &str) -> String {
    match body.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((idx, _)) => body[..idx].to_string(),
        None => body.to_string(),
    }
}

/// Result type alias for mubi-export
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
