//! Filter conditions and the row filter/search evaluator.

use serde::Deserialize;
use serde::Serialize;

use crate::display::display_value;
use crate::display::format_number;
use crate::model::CellValue;
use crate::model::FieldDefinition;
use crate::model::Row;
use crate::model::find_field;

/// The comparison operator of a filter condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterOperator {
    /// Case-insensitive substring match on the display string.
    Contains,
    /// Id equality for select-typed fields, case-insensitive display
    /// equality otherwise.
    Equals,
    /// Negation of `Equals` for non-empty cells.
    NotEquals,
    /// Matches cells whose display string is empty.
    IsEmpty,
    /// Matches cells whose display string is non-empty.
    IsNotEmpty,
    /// Numeric greater-than.
    Gt,
    /// Numeric greater-than-or-equal.
    Gte,
    /// Numeric less-than.
    Lt,
    /// Numeric less-than-or-equal.
    Lte,
}

/// A single filter condition against one field.
///
/// A list of conditions is interpreted as AND-combined predicates. A
/// condition referencing a field that is no longer in the catalog acts as a
/// pass-through: views and filters are user-editable configuration that may
/// go stale after a schema change, and a stale condition must never fail a
/// render.
///
/// # Example
///
/// ```
/// use tablekit_lib::query::FilterConfig;
///
/// let done = FilterConfig::equals("status", "opt_done");
/// let big = FilterConfig::gte("points", 5);
/// let unassigned = FilterConfig::is_empty("assignee");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// The field id the condition applies to.
    pub field: String,
    /// The comparison operator.
    pub operator: FilterOperator,
    /// The comparison operand; unused by `IsEmpty`/`IsNotEmpty`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<CellValue>,
}

impl FilterConfig {
    fn new(field: impl Into<String>, operator: FilterOperator, value: Option<CellValue>) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Creates a contains filter.
    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(
            field,
            FilterOperator::Contains,
            Some(CellValue::Text(value.into())),
        )
    }

    /// Creates an equality filter.
    pub fn equals(field: impl Into<String>, value: impl Into<CellValue>) -> Self {
        Self::new(field, FilterOperator::Equals, Some(value.into()))
    }

    /// Creates a not-equal filter.
    pub fn not_equals(field: impl Into<String>, value: impl Into<CellValue>) -> Self {
        Self::new(field, FilterOperator::NotEquals, Some(value.into()))
    }

    /// Creates an is-empty filter.
    pub fn is_empty(field: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::IsEmpty, None)
    }

    /// Creates an is-not-empty filter.
    pub fn is_not_empty(field: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::IsNotEmpty, None)
    }

    /// Creates a numeric greater-than filter.
    pub fn gt(field: impl Into<String>, value: impl Into<CellValue>) -> Self {
        Self::new(field, FilterOperator::Gt, Some(value.into()))
    }

    /// Creates a numeric greater-than-or-equal filter.
    pub fn gte(field: impl Into<String>, value: impl Into<CellValue>) -> Self {
        Self::new(field, FilterOperator::Gte, Some(value.into()))
    }

    /// Creates a numeric less-than filter.
    pub fn lt(field: impl Into<String>, value: impl Into<CellValue>) -> Self {
        Self::new(field, FilterOperator::Lt, Some(value.into()))
    }

    /// Creates a numeric less-than-or-equal filter.
    pub fn lte(field: impl Into<String>, value: impl Into<CellValue>) -> Self {
        Self::new(field, FilterOperator::Lte, Some(value.into()))
    }
}

/// Evaluates a single filter condition against a row.
///
/// Empty cells (null, missing, empty string, empty tag list) match only
/// `IsEmpty`; every other operator short-circuits to `false` on an empty
/// cell. That includes `NotEquals`: an empty cell is in neither the `Equals`
/// nor the `NotEquals` match set. This is long-standing observed behavior
/// that hosts depend on; keep it.
pub fn matches(row: &Row, filter: &FilterConfig, fields: &[FieldDefinition]) -> bool {
    let Some(field) = find_field(fields, &filter.field) else {
        return true;
    };
    let display = display_value(row.get(&field.id), field);

    match filter.operator {
        FilterOperator::IsEmpty => display.is_empty(),
        FilterOperator::IsNotEmpty => !display.is_empty(),
        _ if display.is_empty() => false,
        FilterOperator::Contains => display
            .to_lowercase()
            .contains(&operand_text(filter).to_lowercase()),
        FilterOperator::Equals => equals_match(row, filter, field, &display),
        FilterOperator::NotEquals => !equals_match(row, filter, field, &display),
        FilterOperator::Gt | FilterOperator::Gte | FilterOperator::Lt | FilterOperator::Lte => {
            numeric_match(row, filter, field)
        }
    }
}

/// Applies an AND-combined filter list, preserving input order.
///
/// An empty filter list is a pass-through, not "select nothing".
pub fn filter_rows<'a>(
    rows: &'a [Row],
    filters: &[FilterConfig],
    fields: &[FieldDefinition],
) -> Vec<&'a Row> {
    filter_refs(rows.iter().collect(), filters, fields)
}

/// Applies an AND-combined filter list to an already-borrowed row view.
pub fn filter_refs<'a>(
    mut rows: Vec<&'a Row>,
    filters: &[FilterConfig],
    fields: &[FieldDefinition],
) -> Vec<&'a Row> {
    if filters.is_empty() {
        return rows;
    }
    rows.retain(|row| filters.iter().all(|filter| matches(row, filter, fields)));
    rows
}

/// Unscoped substring search across all visible fields.
///
/// The term is trimmed and lowercased; a row matches if any visible field's
/// display string contains it. An empty or whitespace-only term is a
/// pass-through. Debouncing rapid keystrokes into one call is host policy.
pub fn search_rows<'a>(rows: &'a [Row], term: &str, fields: &[FieldDefinition]) -> Vec<&'a Row> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return rows.iter().collect();
    }
    rows.iter()
        .filter(|row| {
            fields.iter().filter(|f| f.visible).any(|field| {
                display_value(row.get(&field.id), field)
                    .to_lowercase()
                    .contains(&needle)
            })
        })
        .collect()
}

/// Applies search, then the filter list to the search result.
///
/// The composition order is fixed: search narrows first, the AND-combined
/// filter list runs over the narrowed set.
pub fn apply_all_filters<'a>(
    rows: &'a [Row],
    term: &str,
    filters: &[FilterConfig],
    fields: &[FieldDefinition],
) -> Vec<&'a Row> {
    filter_refs(search_rows(rows, term, fields), filters, fields)
}

fn equals_match(row: &Row, filter: &FilterConfig, field: &FieldDefinition, display: &str) -> bool {
    if field.field_type.uses_options() {
        // Id equality, exact. Multi-select matches when any element equals
        // the target id.
        let target = operand_text(filter);
        return match row.get(&field.id) {
            Some(CellValue::Text(id)) => *id == target,
            Some(CellValue::Tags(ids)) => ids.iter().any(|id| *id == target),
            Some(CellValue::Number(n)) => format_number(*n) == target,
            _ => false,
        };
    }
    display.to_lowercase() == operand_text(filter).to_lowercase()
}

fn numeric_match(row: &Row, filter: &FilterConfig, field: &FieldDefinition) -> bool {
    let cell = row.get(&field.id).and_then(as_f64);
    let operand = filter.value.as_ref().and_then(as_f64);
    let (Some(cell), Some(operand)) = (cell, operand) else {
        return false;
    };
    match filter.operator {
        FilterOperator::Gt => cell > operand,
        FilterOperator::Gte => cell >= operand,
        FilterOperator::Lt => cell < operand,
        FilterOperator::Lte => cell <= operand,
        _ => false,
    }
}

fn as_f64(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Number(n) => Some(*n),
        CellValue::Text(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn operand_text(filter: &FilterConfig) -> String {
    match filter.value.as_ref() {
        Some(CellValue::Text(s)) => s.clone(),
        Some(CellValue::Number(n)) => format_number(*n),
        Some(CellValue::Tags(tags)) => tags.join(", "),
        Some(CellValue::Null) | None => String::new(),
    }
}
