//! Common types used throughout mubi-export
//!
//! Shared type aliases and the pagination cursor.

use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type (insertion ordered)
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// A flattened record: dot-joined path to a scalar cell value.
///
/// Never contains arrays or objects as values.
pub type FlatRow = JsonObject;

// ============================================================================
// Cursor
// ============================================================================

/// Continuation value sent as the `before` query parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Cursor {
    /// Integer identifier (the common case)
    Numeric(i64),
    /// Anything that does not coerce to an integer, sent verbatim
    Raw(String),
}

impl Cursor {
    /// Coerce an item identifier into a cursor.
    ///
    /// Integers, integral floats and strings holding an integer become
    /// `Numeric`; other values are kept raw. Null yields `None`.
    pub fn from_id(id: &JsonValue) -> Option<Self> {
        match id {
            JsonValue::Null => None,
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    return Some(Self::Numeric(i));
                }
                match n.as_f64() {
                    Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                        Some(Self::Numeric(f as i64))
                    }
                    _ => Some(Self::Raw(n.to_string())),
                }
            }
            JsonValue::String(s) => Some(
                s.trim()
                    .parse::<i64>()
                    .map_or_else(|_| Self::Raw(s.clone()), Self::Numeric),
            ),
            JsonValue::Bool(b) => Some(Self::Raw(b.to_string())),
            other => Some(Self::Raw(other.to_string())),
        }
    }

    /// Check if this cursor is numeric
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric(_))
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Raw(s) => f.write_str(s),
        }
    }
}
