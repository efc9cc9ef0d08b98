//! Export schemas
//!
//! Which flattened columns make it into each output file, under what
//! header, and with which cell transform.

/// Prefix stripped from destination column names
pub const FILM_PREFIX: &str = "film.";

/// Film columns exported for every collection
pub const BASE_COLUMNS: &[&str] = &[
    "film.id",
    "film.title",
    "film.original_title",
    "film.year",
    "film.duration",
    "film.popularity",
    "film.genres",
    "film.average_rating",
    "film.average_rating_out_of_ten",
    "film.number_of_ratings",
    "film.critic_review_rating",
    "film.historic_countries",
    "film.default_editorial",
    "film.directors",
];

/// Rewrite applied to a cell during projection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellTransform {
    /// Timestamp reduced to `YYYY-MM-DD`; unparseable values become empty
    DateOnly,
    /// Stringified list of `{name, ...}` objects reduced to the names
    NameList,
}

/// One selected column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    /// Flattened source key
    pub source: String,
    /// Header in the output table
    pub destination: String,
    /// Optional cell rewrite
    pub transform: Option<CellTransform>,
}

impl ColumnMapping {
    /// Map `source` to an explicit destination
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            transform: None,
        }
    }

    /// Map `source` to itself with the `film.` prefix stripped
    pub fn stripped(source: &str) -> Self {
        let destination = source.strip_prefix(FILM_PREFIX).unwrap_or(source);
        Self::new(source, destination)
    }

    /// Set the cell transform
    #[must_use]
    pub fn with_transform(mut self, transform: CellTransform) -> Self {
        self.transform = Some(transform);
        self
    }
}

/// Column of the secondary table, copied from a primary destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedColumn {
    /// Primary table column to copy
    pub source: String,
    /// Header in the secondary table
    pub header: String,
}

impl DerivedColumn {
    pub fn new(source: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            header: header.into(),
        }
    }
}

/// Primary column selection plus the optional secondary (Letterboxd) view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSchema {
    /// Primary columns in output order
    pub columns: Vec<ColumnMapping>,
    /// Secondary columns; empty when the collection has no secondary view
    pub derived: Vec<DerivedColumn>,
}

impl ExportSchema {
    /// Schema for watchlist exports
    pub fn watchlist() -> Self {
        Self {
            columns: base_columns(),
            derived: letterboxd_base(),
        }
    }

    /// Schema for ratings exports
    pub fn ratings() -> Self {
        let mut columns = base_columns();
        columns.extend([
            ColumnMapping::new("overall", "user_rating"),
            ColumnMapping::new("created_at", "rating_date").with_transform(CellTransform::DateOnly),
            ColumnMapping::new("body", "review"),
        ]);

        let mut derived = letterboxd_base();
        derived.extend([
            DerivedColumn::new("user_rating", "Rating"),
            DerivedColumn::new("rating_date", "WatchedDate"),
            DerivedColumn::new("review", "Review"),
        ]);

        Self { columns, derived }
    }

    /// Primary headers in order
    pub fn destinations(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.destination.as_str()).collect()
    }
}

fn base_columns() -> Vec<ColumnMapping> {
    BASE_COLUMNS
        .iter()
        .map(|source| {
            let mapping = ColumnMapping::stripped(source);
            if mapping.destination == "directors" {
                mapping.with_transform(CellTransform::NameList)
            } else {
                mapping
            }
        })
        .collect()
}

fn letterboxd_base() -> Vec<DerivedColumn> {
    vec![
        DerivedColumn::new("title", "Title"),
        DerivedColumn::new("year", "Year"),
        DerivedColumn::new("directors", "Directors"),
    ]
}
