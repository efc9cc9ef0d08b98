//! HTTP fetch module
//!
//! Issues single GET requests with classification-driven retry and backoff.
//!
//! # Features
//!
//! - **Failure classification**: success, terminal, rate-limited, transient
//! - **Exponential backoff**: grows per transient failure, untouched by 429 hints
//! - **Pluggable transport**: `reqwest` in production, scripted in tests
//! - **Injectable sleeping**: every wait goes through a [`Sleeper`]

mod fetcher;
mod request;
mod retry;
mod sleep;
mod transport;

pub use fetcher::{FetcherConfig, FetcherConfigBuilder, RetryingFetcher};
pub use request::{PageRequest, CURSOR_PARAM};
pub use retry::{classify, classify_failure, parse_retry_after, AttemptOutcome, Backoff, RetryPolicy, RetryState};
pub use sleep::{RecordingSleeper, Sleeper, TokioSleeper};
pub use transport::{RawResponse, ReqwestTransport, Transport};
