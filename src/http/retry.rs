//! Retry policy, backoff and attempt classification
//!
//! A fetch is a small state machine:
//!
//! ```text
//! Attempting(n) ──success──────────────▶ Succeeded
//!      │ ──terminal / budget spent─────▶ FailedTerminal
//!      └─retriable──▶ Waiting(delay) ──▶ Attempting(n + 1)
//! ```

use super::transport::RawResponse;
use crate::error::Error;
use crate::types::JsonValue;
use std::time::Duration;

// ============================================================================
// Policy
// ============================================================================

/// How many times to try and how long to wait in between
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Attempts per fetch, including the first (at least 1)
    pub max_attempts: u32,
    /// Wait before the first retry
    pub initial_backoff: Duration,
    /// Growth factor applied after each transient failure
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            initial_backoff: Duration::from_secs(1),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Create a policy; `max_attempts` is raised to 1 and `multiplier` to 1.0 if lower
    pub fn new(max_attempts: u32, initial_backoff: Duration, multiplier: f64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_backoff,
            multiplier: multiplier.max(1.0),
        }
    }

    /// Policy that never retries
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO, 1.0)
    }

    /// Wait before the `n`-th backoff-driven retry (1-based):
    /// `initial * multiplier^(n-1)`
    pub fn delay_for_retry(&self, n: u32) -> Duration {
        let exponent = i32::try_from(n.saturating_sub(1)).unwrap_or(i32::MAX);
        scale(self.initial_backoff, self.multiplier.powi(exponent))
    }
}

// ============================================================================
// Backoff
// ============================================================================

/// Current backoff within one fetch call
#[derive(Debug, Clone)]
pub struct Backoff {
    current: Duration,
    multiplier: f64,
}

impl Backoff {
    /// Start at the policy's initial backoff
    pub fn new(policy: &RetryPolicy) -> Self {
        Self {
            current: policy.initial_backoff,
            multiplier: policy.multiplier,
        }
    }

    /// Wait that the next retry would use, without advancing
    pub fn current(&self) -> Duration {
        self.current
    }

    /// Return the current wait and grow it for the next failure
    pub fn advance(&mut self) -> Duration {
        let delay = self.current;
        self.current = scale(delay, self.multiplier);
        delay
    }
}

fn scale(duration: Duration, factor: f64) -> Duration {
    Duration::try_from_secs_f64(duration.as_secs_f64() * factor).unwrap_or(Duration::MAX)
}

// ============================================================================
// Classification
// ============================================================================

/// What a single attempt produced
#[derive(Debug)]
pub enum AttemptOutcome {
    /// 200 with a JSON body
    Success(JsonValue),
    /// 429, with the server's wait hint if it sent a usable one
    RateLimited { wait_hint: Option<Duration> },
    /// Worth another attempt (5xx, unexpected status, connectivity)
    Transient(Error),
    /// Retrying cannot help
    Terminal(Error),
}

/// Classify an HTTP response
pub fn classify(response: RawResponse) -> AttemptOutcome {
    match response.status {
        200 => match serde_json::from_str(&response.body) {
            Ok(body) => AttemptOutcome::Success(body),
            Err(e) => AttemptOutcome::Terminal(Error::invalid_response(format!(
                "HTTP 200 body is not JSON: {e}"
            ))),
        },
        429 => AttemptOutcome::RateLimited {
            wait_hint: response.retry_after.as_deref().and_then(parse_retry_after),
        },
        status @ 400..=499 => AttemptOutcome::Terminal(Error::client(status, &response.body)),
        status => AttemptOutcome::Transient(Error::server(status, &response.body)),
    }
}

/// Classify a failed transport call
pub fn classify_failure(error: Error) -> AttemptOutcome {
    if error.is_retryable() {
        AttemptOutcome::Transient(error)
    } else {
        AttemptOutcome::Terminal(error)
    }
}

/// Parse a `Retry-After` value given in (possibly fractional) seconds
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
}

// ============================================================================
// State Machine
// ============================================================================

/// State of one fetch call
#[derive(Debug)]
pub enum RetryState {
    /// About to send attempt number `attempt` (1-based)
    Attempting { attempt: u32 },
    /// Suspended before the next attempt
    Waiting {
        delay: Duration,
        next_attempt: u32,
        reason: Error,
    },
    /// Parsed body ready
    Succeeded(JsonValue),
    /// Gave up
    FailedTerminal(Error),
}

impl RetryState {
    /// Initial state
    pub fn start() -> Self {
        Self::Attempting { attempt: 1 }
    }

    /// Transition out of `Attempting { attempt }` given the attempt's outcome.
    ///
    /// Transient failures consume the current backoff and grow it; a 429
    /// waits the server hint (or the current backoff) and leaves it as is.
    /// Once `max_attempts` is reached a retriable outcome becomes
    /// `RetryExhausted` wrapping the last error.
    pub fn after_attempt(
        attempt: u32,
        outcome: AttemptOutcome,
        policy: &RetryPolicy,
        backoff: &mut Backoff,
    ) -> Self {
        match outcome {
            AttemptOutcome::Success(body) => Self::Succeeded(body),
            AttemptOutcome::Terminal(error) => Self::FailedTerminal(error),
            AttemptOutcome::RateLimited { wait_hint } => {
                let reason = Error::RateLimited {
                    retry_after: wait_hint,
                };
                if attempt >= policy.max_attempts {
                    return Self::FailedTerminal(exhausted(attempt, reason));
                }
                Self::Waiting {
                    delay: wait_hint.unwrap_or_else(|| backoff.current()),
                    next_attempt: attempt + 1,
                    reason,
                }
            }
            AttemptOutcome::Transient(reason) => {
                if attempt >= policy.max_attempts {
                    return Self::FailedTerminal(exhausted(attempt, reason));
                }
                Self::Waiting {
                    delay: backoff.advance(),
                    next_attempt: attempt + 1,
                    reason,
                }
            }
        }
    }
}

fn exhausted(attempts: u32, last_error: Error) -> Error {
    Error::RetryExhausted {
        attempts,
        last_error: Box::new(last_error),
    }
}
