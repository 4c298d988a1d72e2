//! Value enum for dynamic cell values

use serde::Deserialize;
use serde::Serialize;

/// A dynamic value that can hold any cell type.
///
/// This enum represents all possible values that can be stored in a table
/// cell. It's used in [`Row`](super::Row) to store field values dynamically.
///
/// # Type Mapping
///
/// | Field Type | Variant |
/// |----------------|--------------|
/// | empty cell | `Null` |
/// | text, title, date, link | `Text` |
/// | single-select, assignee, iteration | `Text` (option id) |
/// | number | `Number` |
/// | multi-select | `Tags` (option ids) |
///
/// # Example
///
/// ```
/// use tablekit_lib::model::CellValue;
///
/// let title = CellValue::from("Fix login flow");
/// let points = CellValue::from(3);
/// let labels = CellValue::from(vec!["opt_bug", "opt_ui"]);
/// let empty = CellValue::Null;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Null/empty cell.
    Null,
    /// Text payload: plain text, ISO-8601 date strings, URLs, option ids.
    Text(String),
    /// Numeric cell.
    Number(f64),
    /// Multi-select cell: a list of option ids.
    Tags(Vec<String>),
}

impl CellValue {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Null => "null",
            CellValue::Text(_) => "text",
            CellValue::Number(_) => "number",
            CellValue::Tags(_) => "tags",
        }
    }

    /// Returns the text payload, if this is a `Text` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the numeric payload, if this is a `Number` value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the tag list, if this is a `Tags` value.
    pub fn as_tags(&self) -> Option<&[String]> {
        match self {
            CellValue::Tags(tags) => Some(tags.as_slice()),
            _ => None,
        }
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::Text(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Number(v)
    }
}

impl From<i32> for CellValue {
    fn from(v: i32) -> Self {
        CellValue::Number(v as f64)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Number(v as f64)
    }
}

impl From<Vec<String>> for CellValue {
    fn from(v: Vec<String>) -> Self {
        CellValue::Tags(v)
    }
}

impl From<Vec<&str>> for CellValue {
    fn from(v: Vec<&str>) -> Self {
        CellValue::Tags(v.into_iter().map(str::to_string).collect())
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => CellValue::Null,
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_impls() {
        assert_eq!(CellValue::from("a"), CellValue::Text("a".to_string()));
        assert_eq!(CellValue::from(3), CellValue::Number(3.0));
        assert_eq!(CellValue::from(2.5), CellValue::Number(2.5));
        assert_eq!(
            CellValue::from(vec!["x", "y"]),
            CellValue::Tags(vec!["x".to_string(), "y".to_string()])
        );
        assert_eq!(CellValue::from(None::<&str>), CellValue::Null);
    }

    #[test]
    fn test_serde_untagged() {
        let json = serde_json::to_string(&CellValue::Null).unwrap();
        assert_eq!(json, "null");

        let text: CellValue = serde_json::from_str("\"hello\"").unwrap();
        assert_eq!(text, CellValue::Text("hello".to_string()));

        let num: CellValue = serde_json::from_str("42").unwrap();
        assert_eq!(num, CellValue::Number(42.0));

        let tags: CellValue = serde_json::from_str("[\"a\",\"b\"]").unwrap();
        assert_eq!(tags, CellValue::from(vec!["a", "b"]));
    }

    #[test]
    fn test_accessors() {
        assert!(CellValue::Null.is_null());
        assert_eq!(CellValue::from("x").as_str(), Some("x"));
        assert_eq!(CellValue::from(1.5).as_number(), Some(1.5));
        assert_eq!(CellValue::from("x").as_number(), None);
    }
}
