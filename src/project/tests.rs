use super::*;
use crate::flatten::flatten;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

fn rating_row() -> FlatRow {
    flatten(
        &json!({
            "overall": 8,
            "created_at": "2023-05-01T00:00:00Z",
            "film": {
                "id": 1,
                "title": "X",
                "year": 2001,
                "directors": [{"name": "A"}, {"name": "B"}]
            }
        }),
        "",
    )
}

// ============================================================================
// Projection
// ============================================================================

#[test]
fn test_project_single_rating() {
    let projection = project(&[rating_row()], &ExportSchema::ratings(), false);
    let table = projection.primary;

    assert_eq!(table.len(), 1);
    assert_eq!(table.cell(0, "user_rating"), Some("8"));
    assert_eq!(table.cell(0, "rating_date"), Some("2023-05-01"));
    assert_eq!(table.cell(0, "directors"), Some("A, B"));
    assert_eq!(table.cell(0, "title"), Some("X"));
    assert_eq!(table.cell(0, "id"), Some("1"));
    assert!(projection.secondary.is_none());
}

#[test]
fn test_ratings_headers() {
    let schema = ExportSchema::ratings();
    let headers = schema.destinations();
    assert_eq!(headers.len(), BASE_COLUMNS.len() + 3);
    assert_eq!(headers[0], "id");
    assert_eq!(&headers[headers.len() - 3..], &["user_rating", "rating_date", "review"]);
    assert!(headers.iter().all(|h| !h.starts_with(FILM_PREFIX)));
}

#[test]
fn test_watchlist_headers() {
    let schema = ExportSchema::watchlist();
    assert_eq!(schema.destinations().len(), BASE_COLUMNS.len());
    assert_eq!(schema.destinations().last(), Some(&"directors"));
}

#[test]
fn test_missing_columns_are_empty() {
    let row = flatten(&json!({"film": {"title": "Only a title"}}), "");
    let table = project(&[row], &ExportSchema::ratings(), false).primary;

    assert_eq!(table.cell(0, "title"), Some("Only a title"));
    assert_eq!(table.cell(0, "year"), Some(""));
    assert_eq!(table.cell(0, "directors"), Some(""));
    assert_eq!(table.cell(0, "rating_date"), Some(""));
    assert_eq!(table.rows[0].len(), table.columns.len());
}

#[test]
fn test_unparseable_date_becomes_empty() {
    let row = flatten(&json!({"created_at": "last tuesday", "film": {"id": 2}}), "");
    let table = project(&[row], &ExportSchema::ratings(), false).primary;
    assert_eq!(table.cell(0, "rating_date"), Some(""));
}

#[test]
fn test_watchlist_keeps_created_at_out() {
    let row = flatten(&json!({"created_at": "2023-05-01T00:00:00Z", "film": {"id": 2}}), "");
    let table = project(&[row], &ExportSchema::watchlist(), false).primary;
    assert!(table.column_index("rating_date").is_none());
    assert!(table.column_index("created_at").is_none());
}

#[test]
fn test_letterboxd_ratings() {
    let mut review = rating_row();
    review.insert("body".to_string(), json!("Loved it"));

    let projection = project(&[review], &ExportSchema::ratings(), true);
    let letterboxd = projection.secondary.unwrap();

    assert_eq!(
        letterboxd.columns,
        vec!["Title", "Year", "Directors", "Rating", "WatchedDate", "Review"]
    );
    assert_eq!(
        letterboxd.rows,
        vec![vec!["X", "2001", "A, B", "8", "2023-05-01", "Loved it"]]
    );
}

#[test]
fn test_letterboxd_watchlist() {
    let row = flatten(&json!({"film": {"title": "Y", "year": 1999, "directors": []}}), "");
    let letterboxd = project(&[row], &ExportSchema::watchlist(), true)
        .secondary
        .unwrap();

    assert_eq!(letterboxd.columns, vec!["Title", "Year", "Directors"]);
    assert_eq!(letterboxd.rows, vec![vec!["Y", "1999", ""]]);
}

#[test]
fn test_project_empty_rows() {
    let projection = project(&[], &ExportSchema::watchlist(), true);
    assert!(projection.primary.is_empty());
    assert_eq!(projection.primary.columns.len(), BASE_COLUMNS.len());
    assert!(projection.secondary.unwrap().is_empty());
}

// ============================================================================
// Transforms
// ============================================================================

#[test_case("2023-05-01T00:00:00Z", "2023-05-01"; "utc")]
#[test_case("2023-05-01T23:30:00.123+02:00", "2023-05-01"; "offset keeps local date")]
#[test_case("2023-05-01T10:00:00+0000", "2023-05-01"; "offset without colon")]
#[test_case("2023-05-01T10:00:00", "2023-05-01"; "naive datetime")]
#[test_case("2023-05-01 10:00:00", "2023-05-01"; "space separated")]
#[test_case("2023-05-01", "2023-05-01"; "date only")]
#[test_case("not a date", ""; "garbage")]
#[test_case("", ""; "empty")]
fn test_date_only(input: &str, expected: &str) {
    assert_eq!(date_only(input), expected);
}

#[test_case(r#"{"name":"A"}, {"name":"B"}"#, "A, B"; "objects")]
#[test_case(r#"{"name":"Solo","id":3}"#, "Solo"; "single object")]
#[test_case(r#"{"id":3}"#, ""; "object without name")]
#[test_case(r#""A", {"name":"B"}"#, "A, B"; "string and object")]
#[test_case("Andrei Tarkovsky", "Andrei Tarkovsky"; "plain text kept")]
#[test_case("", ""; "empty")]
fn test_name_list(input: &str, expected: &str) {
    assert_eq!(name_list(input), expected);
}

// ============================================================================
// Tables
// ============================================================================

#[test]
fn test_table_from_rows_union_header() {
    let rows = vec![
        flatten(&json!({"a": 1, "b": "x"}), ""),
        flatten(&json!({"c": true, "a": null}), ""),
    ];
    let table = Table::from_rows(&rows);

    assert_eq!(table.columns, vec!["a", "b", "c"]);
    assert_eq!(
        table.rows,
        vec![vec!["1", "x", ""], vec!["", "", "true"]]
    );
}

#[test_case(json!(null), ""; "null")]
#[test_case(json!("text"), "text"; "string")]
#[test_case(json!(8), "8"; "integer")]
#[test_case(json!(7.5), "7.5"; "float")]
#[test_case(json!(false), "false"; "bool")]
fn test_render_cell(value: JsonValue, expected: &str) {
    assert_eq!(render_cell(&value), expected);
}

#[test]
fn test_table_push_row_pads() {
    let mut table = Table::new(["a", "b"]);
    table.push_row(vec!["1".to_string()]);
    assert_eq!(table.rows[0], vec!["1", ""]);
    assert_eq!(table.column("b"), vec![""]);
    assert!(table.column("missing").is_empty());
}
