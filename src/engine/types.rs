//! Engine types
//!
//! Collections, per-run options and statistics.

use crate::config::FallbackSettings;
use crate::project::ExportSchema;
use std::fmt;
use std::path::PathBuf;

/// A user collection that can be exported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Films the user wants to watch
    Watchlist,
    /// Films the user has rated
    Ratings,
}

impl Collection {
    /// All collections, in export order
    pub const ALL: [Collection; 2] = [Collection::Watchlist, Collection::Ratings];

    /// Primary API endpoint
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Watchlist => "wishes",
            Self::Ratings => "ratings",
        }
    }

    /// Name used in file names and logs
    pub fn label(self) -> &'static str {
        match self {
            Self::Watchlist => "watchlist",
            Self::Ratings => "ratings",
        }
    }

    /// Projection schema
    pub fn schema(self) -> ExportSchema {
        match self {
            Self::Watchlist => ExportSchema::watchlist(),
            Self::Ratings => ExportSchema::ratings(),
        }
    }

    /// Alternate endpoints configured for this collection
    pub fn fallbacks(self, settings: &FallbackSettings) -> &[String] {
        match self {
            Self::Watchlist => &settings.watchlist,
            Self::Ratings => &settings.ratings,
        }
    }

    /// File stem of the primary table, e.g. `mubi_42_ratings`
    pub fn file_stem(self, user_id: &str) -> String {
        format!("mubi_{user_id}_{}", self.label())
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-run options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// User whose collections are exported
    pub user_id: String,
    /// Optional bearer token
    pub token: Option<String>,
    /// Items requested per page
    pub per_page: u32,
    /// Value of the `client-country` header
    pub country: String,
    /// Also write the Letterboxd-shaped table
    pub letterboxd: bool,
    /// Also write the unprojected flattened table
    pub raw: bool,
}

impl ExportOptions {
    /// Create options with default page size and country
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            token: None,
            per_page: 24,
            country: "NL".to_string(),
            letterboxd: false,
            raw: false,
        }
    }

    /// Set the bearer token
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Set the page size
    #[must_use]
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Set the country
    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// Write the Letterboxd table too
    #[must_use]
    pub fn with_letterboxd(mut self, letterboxd: bool) -> Self {
        self.letterboxd = letterboxd;
        self
    }

    /// Write the raw table too
    #[must_use]
    pub fn with_raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }
}

/// Items of one collection and the endpoint that produced them
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedCollection {
    /// Collection fetched
    pub collection: Collection,
    /// Endpoint the items came from; `None` when every endpoint failed
    pub endpoint: Option<String>,
    /// Items in page order
    pub items: Vec<serde_json::Value>,
}

/// Statistics from an export run
#[derive(Debug, Clone, Default)]
pub struct ExportStats {
    /// Collections exported
    pub collections_exported: usize,
    /// Items fetched across all collections
    pub items_fetched: usize,
    /// Fallback endpoints tried
    pub fallbacks_tried: usize,
    /// Files written, in order
    pub files_written: Vec<PathBuf>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl ExportStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add items
    pub fn add_items(&mut self, count: usize) {
        self.items_fetched += count;
    }

    /// Add a collection
    pub fn add_collection(&mut self) {
        self.collections_exported += 1;
    }

    /// Add a fallback attempt
    pub fn add_fallback(&mut self) {
        self.fallbacks_tried += 1;
    }

    /// Record a written file
    pub fn add_file(&mut self, path: PathBuf) {
        self.files_written.push(path);
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
