//! Display resolution for raw cell values.
//!
//! Raw cells store option ids and typed payloads; the display value is the
//! human-readable string the host renders, searches, and (for select-typed
//! fields) sorts by. Resolution is pure and total: unknown option ids degrade
//! to their raw string form rather than failing.

use crate::model::CellValue;
use crate::model::FieldDefinition;

/// Resolves a raw cell value to its display string.
///
/// - Missing cells and `Null` resolve to the empty string.
/// - Select-typed fields (single-select, assignee, iteration) look the id up
///   in the field's options, falling back to the raw id when no option
///   matches.
/// - Multi-select maps each element through the same lookup and joins with
///   `", "`, skipping elements only when they resolve to an empty string.
/// - Everything else resolves to the raw value's string form.
///
/// # Example
///
/// ```
/// use tablekit_lib::display::display_value;
/// use tablekit_lib::model::{CellValue, FieldDefinition, FieldType, SelectOption};
///
/// let status = FieldDefinition::new("status", "Status", FieldType::SingleSelect)
///     .with_options(vec![SelectOption::new("opt_done", "Done")]);
///
/// let value = CellValue::from("opt_done");
/// assert_eq!(display_value(Some(&value), &status), "Done");
/// assert_eq!(display_value(None, &status), "");
/// ```
pub fn display_value(value: Option<&CellValue>, field: &FieldDefinition) -> String {
    let value = match value {
        None | Some(CellValue::Null) => return String::new(),
        Some(v) => v,
    };

    if field.field_type.uses_options() {
        return match value {
            CellValue::Text(id) => resolve_option(field, id),
            CellValue::Tags(ids) => {
                let labels: Vec<String> = ids
                    .iter()
                    .map(|id| resolve_option(field, id))
                    .filter(|label| !label.is_empty())
                    .collect();
                labels.join(", ")
            }
            CellValue::Number(n) => resolve_option(field, &format_number(*n)),
            CellValue::Null => String::new(),
        };
    }

    match value {
        CellValue::Text(s) => s.clone(),
        CellValue::Number(n) => format_number(*n),
        CellValue::Tags(tags) => tags.join(", "),
        CellValue::Null => String::new(),
    }
}

fn resolve_option(field: &FieldDefinition, id: &str) -> String {
    match field.option_label(id) {
        Some(label) => label.to_string(),
        None => id.to_string(),
    }
}

/// Formats a number for display, rendering integral values without a
/// trailing `.0`.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
