//! Sort directives and the stable row comparator.

use std::cmp::Ordering;

use serde::Deserialize;
use serde::Serialize;

use crate::display::display_value;
use crate::model::CellValue;
use crate::model::FieldDefinition;
use crate::model::Row;
use crate::model::find_field;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

/// The active sort directive: one field, one direction.
///
/// # Example
///
/// ```
/// use tablekit_lib::query::SortConfig;
///
/// let by_points = SortConfig::desc("points");
/// let by_title = SortConfig::asc("title");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortConfig {
    /// The field id to sort by.
    pub field: String,
    /// The sort direction.
    pub direction: Direction,
}

impl SortConfig {
    /// Creates an ascending sort on a field.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Asc,
        }
    }

    /// Creates a descending sort on a field.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Desc,
        }
    }
}

/// Comparison key for one row under one sort field.
///
/// Select-typed fields key on the resolved display label so the order is
/// alphabetical by what the user sees, not by internal option id. ISO-8601
/// date strings compare correctly as plain text.
#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Empty,
    Number(f64),
    Text(String),
}

/// Sorts rows by a directive, returning a new ordered view.
///
/// - `None` (or a directive naming an unknown field) returns the input
///   order unchanged.
/// - The sort is stable: rows with equal keys keep their input order.
/// - Empty cells sort after all non-empty cells in BOTH directions; the
///   direction flips only the comparison of two non-empty keys.
pub fn sort_rows<'a>(
    rows: &'a [Row],
    sort: Option<&SortConfig>,
    fields: &[FieldDefinition],
) -> Vec<&'a Row> {
    sort_refs(rows.iter().collect(), sort, fields)
}

/// Sorts an already-borrowed row view by a directive.
pub fn sort_refs<'a>(
    rows: Vec<&'a Row>,
    sort: Option<&SortConfig>,
    fields: &[FieldDefinition],
) -> Vec<&'a Row> {
    let Some(sort) = sort else {
        return rows;
    };
    let Some(field) = find_field(fields, &sort.field) else {
        return rows;
    };

    let mut keyed: Vec<(SortKey, &Row)> = rows
        .into_iter()
        .map(|row| (sort_key(row, field), row))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare_keys(a, b, sort.direction));
    keyed.into_iter().map(|(_, row)| row).collect()
}

fn sort_key(row: &Row, field: &FieldDefinition) -> SortKey {
    let value = row.get(&field.id);

    if field.field_type.uses_options() {
        let label = display_value(value, field);
        return if label.is_empty() {
            SortKey::Empty
        } else {
            SortKey::Text(label.to_lowercase())
        };
    }

    match value {
        None | Some(CellValue::Null) => SortKey::Empty,
        Some(CellValue::Number(n)) => SortKey::Number(*n),
        Some(CellValue::Text(s)) => {
            if s.is_empty() {
                SortKey::Empty
            } else {
                SortKey::Text(s.to_lowercase())
            }
        }
        Some(CellValue::Tags(tags)) => {
            if tags.is_empty() {
                SortKey::Empty
            } else {
                SortKey::Text(tags.join(", ").to_lowercase())
            }
        }
    }
}

fn compare_keys(a: &SortKey, b: &SortKey, direction: Direction) -> Ordering {
    // Empties pin to the end regardless of direction.
    match (a, b) {
        (SortKey::Empty, SortKey::Empty) => return Ordering::Equal,
        (SortKey::Empty, _) => return Ordering::Greater,
        (_, SortKey::Empty) => return Ordering::Less,
        _ => {}
    }
    let ordering = match (a, b) {
        (SortKey::Number(x), SortKey::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
        (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
        (SortKey::Text(x), SortKey::Text(y)) => x.cmp(y),
        _ => Ordering::Equal,
    };
    match direction {
        Direction::Asc => ordering,
        Direction::Desc => ordering.reverse(),
    }
}
