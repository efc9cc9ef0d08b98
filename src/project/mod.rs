//! Row projection
//!
//! Selects, renames and rewrites flattened columns into the exported
//! tables. Projection never fails: a missing source column is an empty
//! cell and a cell that does not parse is left as-is or emptied.

mod schema;
mod table;

pub use schema::{
    CellTransform, ColumnMapping, DerivedColumn, ExportSchema, BASE_COLUMNS, FILM_PREFIX,
};
pub use table::{render_cell, Table};

use crate::types::{FlatRow, JsonValue};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Output of one projection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    /// The cleaned table
    pub primary: Table,
    /// The narrower Letterboxd-shaped table, when requested
    pub secondary: Option<Table>,
}

/// Project flattened rows through a schema
pub fn project(rows: &[FlatRow], schema: &ExportSchema, derive_secondary: bool) -> Projection {
    let mut primary = Table::new(schema.destinations());
    for row in rows {
        let cells = schema
            .columns
            .iter()
            .map(|mapping| {
                let cell = row.get(&mapping.source).map(render_cell).unwrap_or_default();
                match mapping.transform {
                    Some(transform) => apply_transform(transform, &cell),
                    None => cell,
                }
            })
            .collect();
        primary.push_row(cells);
    }

    let secondary = (derive_secondary && !schema.derived.is_empty())
        .then(|| derive(&primary, schema));

    Projection { primary, secondary }
}

fn derive(primary: &Table, schema: &ExportSchema) -> Table {
    let mut secondary = Table::new(schema.derived.iter().map(|d| d.header.as_str()));
    let indices: Vec<Option<usize>> = schema
        .derived
        .iter()
        .map(|d| primary.column_index(&d.source))
        .collect();

    for row in &primary.rows {
        let cells = indices
            .iter()
            .map(|index| {
                index
                    .and_then(|i| row.get(i))
                    .cloned()
                    .unwrap_or_default()
            })
            .collect();
        secondary.push_row(cells);
    }
    secondary
}

/// Apply a cell transform to rendered text
pub fn apply_transform(transform: CellTransform, cell: &str) -> String {
    match transform {
        CellTransform::DateOnly => date_only(cell),
        CellTransform::NameList => name_list(cell),
    }
}

/// Reduce a timestamp to its calendar date, or empty if it does not parse.
///
/// Offsets are kept: the date is the one local to the timestamp's own zone.
pub fn date_only(cell: &str) -> String {
    let text = cell.trim();
    if text.is_empty() {
        return String::new();
    }

    let date = DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| {
            ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| NaiveDate::parse_from_str(text, "%Y-%m-%d").ok());

    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Re-render a stringified list of `{name, ...}` objects as the names
/// joined by `", "`. Text that does not parse is returned unchanged.
pub fn name_list(cell: &str) -> String {
    if cell.trim().is_empty() {
        return String::new();
    }

    let Ok(JsonValue::Array(entries)) = serde_json::from_str::<JsonValue>(&format!("[{cell}]")) else {
        return cell.to_string();
    };

    entries
        .iter()
        .map(|entry| match entry {
            JsonValue::Object(object) => object.get("name").map(render_cell).unwrap_or_default(),
            other => render_cell(other),
        })
        .collect::<Vec<_>>()
        .join(crate::flatten::LIST_SEPARATOR)
}

#[cfg(test)]
mod tests;
