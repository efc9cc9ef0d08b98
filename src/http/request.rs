//! Page request description

use crate::types::Cursor;

/// Query parameter carrying the continuation cursor
pub const CURSOR_PARAM: &str = "before";

/// A single page GET: URL, fixed query parameters, optional cursor, headers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// Fully templated collection URL
    pub url: String,
    /// Fixed query parameters, in order
    pub query: Vec<(String, String)>,
    /// Request headers, in order
    pub headers: Vec<(String, String)>,
    /// Cursor from the previous page; `None` requests the first page
    pub cursor: Option<Cursor>,
}

impl PageRequest {
    /// Create a request for the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Add several headers
    #[must_use]
    pub fn headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Set the cursor
    #[must_use]
    pub fn cursor(mut self, cursor: Option<Cursor>) -> Self {
        self.cursor = cursor;
        self
    }

    /// Query pairs to send: the fixed parameters, then `before` if a cursor is held
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = self.query.clone();
        if let Some(cursor) = &self.cursor {
            pairs.push((CURSOR_PARAM.to_string(), cursor.to_string()));
        }
        pairs
    }

    /// Look up a header value (case-insensitive)
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}
