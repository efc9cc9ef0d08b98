//! Rendered tables

use crate::types::{FlatRow, JsonValue};

/// A header plus rows of rendered string cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Column headers, in output order
    pub columns: Vec<String>,
    /// Rows; each has exactly `columns.len()` cells
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table with the given header
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Build an unprojected table whose header is the union of all row
    /// keys in first-seen order
    pub fn from_rows(rows: &[FlatRow]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in rows {
            for key in row.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|column| row.get(column).map(render_cell).unwrap_or_default())
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    /// Append a row, padding or truncating it to the header width
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at `row` in column `name`
    pub fn cell(&self, row: usize, name: &str) -> Option<&str> {
        let index = self.column_index(name)?;
        self.rows.get(row)?.get(index).map(String::as_str)
    }

    /// All cells of a column, top to bottom
    pub fn column(&self, name: &str) -> Vec<&str> {
        match self.column_index(name) {
            Some(index) => self
                .rows
                .iter()
                .map(|row| row.get(index).map_or("", String::as_str))
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Render a scalar as a cell: null is empty, strings verbatim, numbers in
/// their JSON form, booleans as `true`/`false`
pub fn render_cell(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
