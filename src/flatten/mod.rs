//! JSON flattening
//!
//! Turns a nested item into a single-level row keyed by dot-joined paths.
//! Lists collapse into one comma-separated string cell and media fields
//! (images, trailers) are dropped wherever they appear.

use crate::types::{FlatRow, JsonValue};

/// Object keys removed at every depth
pub const MEDIA_KEYS: &[&str] = &[
    "stills",
    "still_url",
    "portrait_image",
    "trailer_url",
    "artworks",
    "optimised_trailers",
];

/// Separator placed between list elements in a single cell
pub const LIST_SEPARATOR: &str = ", ";

/// Flatten `value` under `prefix` (empty for the root).
///
/// Never fails. The result holds only scalar values; a scalar passed at the
/// root ends up under the `prefix` key itself.
pub fn flatten(value: &JsonValue, prefix: &str) -> FlatRow {
    let mut row = FlatRow::new();
    flatten_into(value, prefix, &mut row);
    row
}

/// Flatten each item of a sweep
pub fn flatten_all(items: &[JsonValue]) -> Vec<FlatRow> {
    items.iter().map(|item| flatten(item, "")).collect()
}

fn flatten_into(value: &JsonValue, path: &str, row: &mut FlatRow) {
    match value {
        JsonValue::Object(object) => {
            for (key, child) in object {
                if is_media_key(key) {
                    continue;
                }
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                flatten_into(child, &child_path, row);
            }
        }
        JsonValue::Array(items) => {
            row.insert(path.to_string(), JsonValue::String(render_list(items)));
        }
        scalar => {
            row.insert(path.to_string(), scalar.clone());
        }
    }
}

/// Check if a key names a media field
pub fn is_media_key(key: &str) -> bool {
    MEDIA_KEYS.contains(&key)
}

/// Render a list as one cell: strings verbatim, everything else as
/// compact JSON
fn render_list(items: &[JsonValue]) -> String {
    items
        .iter()
        .map(|item| match item {
            JsonValue::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}
