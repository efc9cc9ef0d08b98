//! Locating items and cursors inside page bodies

use crate::error::{Error, Result};
use crate::types::{Cursor, JsonValue};
use url::Url;

/// Top-level keys that hold a collection's items
pub const KNOWN_LIST_KEYS: &[&str] = &["wishes", "ratings"];

/// Wrapper objects checked for an `id` before searching the whole item
const ID_WRAPPERS: &[&str] = &["wish", "film"];

/// Find the list of items in a page body.
///
/// Tries the endpoint's own key, the other known keys, a top-level `data`
/// array, then the first array found depth-first. A top-level array is the
/// page itself. Anything else yields an empty slice.
pub fn extract_items<'a>(body: &'a JsonValue, endpoint: &str) -> &'a [JsonValue] {
    let object = match body {
        JsonValue::Array(items) => return items,
        JsonValue::Object(object) => object,
        _ => return &[],
    };

    std::iter::once(endpoint)
        .chain(KNOWN_LIST_KEYS.iter().copied())
        .chain(std::iter::once("data"))
        .find_map(|key| object.get(key).and_then(JsonValue::as_array))
        .or_else(|| object.values().find_map(first_array))
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn first_array(value: &JsonValue) -> Option<&Vec<JsonValue>> {
    match value {
        JsonValue::Array(items) => Some(items),
        JsonValue::Object(object) => object.values().find_map(first_array),
        _ => None,
    }
}

/// Derive the next cursor from the last item of a page.
///
/// Looks at the item's own `id`, then `wish.id` and `film.id`, then the
/// first `id` anywhere inside it. Null identifiers are skipped.
pub fn extract_cursor(item: &JsonValue) -> Option<Cursor> {
    let direct = item.get("id");
    let wrapped = ID_WRAPPERS
        .iter()
        .filter_map(|key| item.get(*key).and_then(|inner| inner.get("id")));

    direct
        .into_iter()
        .chain(wrapped)
        .find_map(Cursor::from_id)
        .or_else(|| find_id(item))
}

fn find_id(value: &JsonValue) -> Option<Cursor> {
    match value {
        JsonValue::Object(object) => object
            .get("id")
            .and_then(Cursor::from_id)
            .or_else(|| object.values().find_map(find_id)),
        JsonValue::Array(items) => items.iter().find_map(find_id),
        _ => None,
    }
}

/// Build `{base}/{user_id}/{endpoint}`, percent-encoding both segments
pub fn build_collection_url(base: &str, user_id: &str, endpoint: &str) -> Result<String> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|()| Error::invalid_value("base_url", format!("'{base}' cannot be a base URL")))?
        .pop_if_empty()
        .push(user_id)
        .push(endpoint);
    Ok(url.to_string())
}
