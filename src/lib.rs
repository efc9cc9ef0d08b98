// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # mubi-export
//!
//! Exports a MUBI user's watchlist and ratings to CSV.
//!
//! Each collection is swept page by page through the cursor-paginated
//! user API, every item is flattened into a single-level row, and the rows
//! are projected into a cleaned table (plus, optionally, a
//! Letterboxd-importable one).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mubi_export::config::ExportConfig;
//! use mubi_export::engine::{Collection, ExportOptions, Exporter};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> mubi_export::Result<()> {
//!     let config = ExportConfig::default();
//!     let mut exporter = Exporter::from_config(&config)?;
//!     let options = ExportOptions::new("123456").with_letterboxd(true);
//!     exporter.export(&Collection::ALL, &options).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Exporter                              │
//! │   fetch_collection (fallbacks) → tabulate → CsvWriter        │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//! ┌───────────────┬─────────────┴───┬─────────────┬──────────────┐
//! │     HTTP      │   Pagination    │   Flatten   │   Project    │
//! ├───────────────┼─────────────────┼─────────────┼──────────────┤
//! │ Transport     │ before=<id>     │ dot paths   │ column select│
//! │ Retry/backoff │ list/id search  │ list joins  │ dates, names │
//! │ Retry-After   │ client headers  │ media drop  │ Letterboxd   │
//! └───────────────┴─────────────────┴─────────────┴──────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Export configuration
pub mod config;

/// Page fetching with retry and backoff
pub mod http;

/// Cursor pagination over collection endpoints
pub mod pagination;

/// JSON flattening
pub mod flatten;

/// Column projection and tables
pub mod project;

/// CSV output
pub mod output;

/// Export orchestration
pub mod engine;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::ExportConfig;
pub use engine::{Collection, ExportOptions, Exporter};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
