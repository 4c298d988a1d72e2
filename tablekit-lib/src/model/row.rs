//! Dynamic table row

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use super::CellValue;
use super::FieldDefinition;
use crate::display::display_value;

/// A single table row.
///
/// Rows hold cell values as a `HashMap<String, CellValue>` keyed by field id,
/// allowing dynamic access to any column. Row ids are caller-supplied, unique,
/// and stable across sorts and filters; selection and drag-fill track rows by
/// id, never by index. The engine never mutates a row in place; every
/// transformation produces a new ordered view over borrowed rows.
///
/// # Example
///
/// ```
/// use tablekit_lib::model::Row;
///
/// let row = Row::new("r1")
///     .set("title", "Fix login flow")
///     .set("points", 3);
///
/// assert_eq!(row.text("title"), Some("Fix login flow"));
/// assert_eq!(row.number("points"), Some(3.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// The unique, stable row id.
    pub id: String,

    /// The cell values, keyed by field id.
    #[serde(default)]
    pub values: HashMap<String, CellValue>,

    /// Optional rich body content (rendered by the host, opaque here).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Row {
    /// Creates a new empty row.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            values: HashMap::new(),
            content: None,
        }
    }

    /// Sets a cell value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    /// Sets the rich body content (builder pattern).
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Inserts a cell value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<CellValue>) {
        self.values.insert(field.into(), value.into());
    }

    /// Removes a cell and returns its value.
    pub fn remove(&mut self, field: &str) -> Option<CellValue> {
        self.values.remove(field)
    }

    /// Returns a reference to the cell value, if the cell exists.
    pub fn get(&self, field: &str) -> Option<&CellValue> {
        self.values.get(field)
    }

    /// Returns `true` if the row contains the given cell.
    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    // =========================================================================
    // Typed getters
    //
    // Missing cells and Null cells both read as None: stale view and filter
    // configuration routinely references fields a row never had, and that
    // must stay silent-safe.
    // =========================================================================

    /// Gets a text cell value.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.values.get(field).and_then(CellValue::as_str)
    }

    /// Gets a numeric cell value.
    pub fn number(&self, field: &str) -> Option<f64> {
        self.values.get(field).and_then(CellValue::as_number)
    }

    /// Gets a multi-select cell value.
    pub fn tags(&self, field: &str) -> Option<&[String]> {
        self.values.get(field).and_then(CellValue::as_tags)
    }

    /// Resolves the display string for a cell through a field definition.
    pub fn display(&self, field: &FieldDefinition) -> String {
        display_value(self.get(&field.id), field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_access() {
        let row = Row::new("r1").set("title", "Hello").set("points", 5);
        assert_eq!(row.id, "r1");
        assert_eq!(row.text("title"), Some("Hello"));
        assert_eq!(row.number("points"), Some(5.0));
        assert!(row.contains("title"));
        assert!(!row.contains("status"));
    }

    #[test]
    fn test_typed_getters_missing_and_null() {
        let row = Row::new("r1").set("empty", CellValue::Null);
        assert_eq!(row.text("empty"), None);
        assert_eq!(row.text("absent"), None);
        assert_eq!(row.number("empty"), None);
    }

    #[test]
    fn test_insert_remove() {
        let mut row = Row::new("r1");
        row.insert("status", "opt_done");
        assert_eq!(row.text("status"), Some("opt_done"));
        assert_eq!(row.remove("status"), Some(CellValue::from("opt_done")));
        assert_eq!(row.get("status"), None);
    }
}
