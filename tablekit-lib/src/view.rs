//! Named views and the view composer.
//!
//! A view is a named snapshot of column visibility/order, filters, sort
//! directive, and grouping. Composing a view merges those four into the
//! effective visible field list and ordered, filtered row set the host
//! renders.

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::display::display_value;
use crate::model::FieldDefinition;
use crate::model::Row;
use crate::model::find_field;
use crate::query::FilterConfig;
use crate::query::SortConfig;
use crate::query::filter_rows;
use crate::query::sort_refs;

/// A named bundle of columns, filters, sort, and grouping.
///
/// Switching the active view replaces all four atomically; there is no
/// intermediate state where only some have updated.
///
/// # Example
///
/// ```
/// use tablekit_lib::query::{FilterConfig, SortConfig};
/// use tablekit_lib::view::ViewConfig;
///
/// let view = ViewConfig::new("Open items")
///     .with_columns(vec!["title", "status", "points"])
///     .with_filters(vec![FilterConfig::not_equals("status", "opt_done")])
///     .with_sort(SortConfig::desc("points"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewConfig {
    /// The unique view id.
    pub id: String,
    /// The display name.
    pub name: String,
    /// Visible field ids, in display order. Column order is first-class,
    /// persisted view state, not the catalog's declaration order.
    #[serde(default)]
    pub columns: Vec<String>,
    /// AND-combined filter conditions.
    #[serde(default)]
    pub filters: Vec<FilterConfig>,
    /// The active sort directive, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortConfig>,
    /// The field rows are grouped by, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<String>,
}

impl ViewConfig {
    /// Creates an empty view with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            columns: Vec::new(),
            filters: Vec::new(),
            sort_by: None,
            group_by: None,
        }
    }

    /// Sets the visible columns, in order.
    pub fn with_columns<S: Into<String>>(mut self, columns: Vec<S>) -> Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the filter list.
    pub fn with_filters(mut self, filters: Vec<FilterConfig>) -> Self {
        self.filters = filters;
        self
    }

    /// Sets the sort directive.
    pub fn with_sort(mut self, sort: SortConfig) -> Self {
        self.sort_by = Some(sort);
        self
    }

    /// Sets the group-by field.
    pub fn with_group_by(mut self, field: impl Into<String>) -> Self {
        self.group_by = Some(field.into());
        self
    }
}

/// One group of the effective row set, keyed by display value.
#[derive(Debug, Clone, PartialEq)]
pub struct RowGroup<'a> {
    /// The resolved display value of the group-by field. Rows with an empty
    /// display collapse under `""`.
    pub key: String,
    /// The group's rows, in effective order.
    pub rows: Vec<&'a Row>,
}

/// The composed output of a view over one row/field snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedView<'a> {
    /// Fields visible under the view, in the view's column order.
    pub visible_fields: Vec<&'a FieldDefinition>,
    /// The effective rows: filtered, then sorted.
    pub rows: Vec<&'a Row>,
    /// Groups over the effective rows when the view has a group-by field.
    pub groups: Option<Vec<RowGroup<'a>>>,
}

/// Composes a view over caller-owned rows and fields.
///
/// `visible_fields` is the catalog filtered to the view's column ids, in the
/// view's order; ids no longer in the catalog are skipped silently. The
/// effective rows are `sort(filter(rows))` under the view's filters and
/// sort directive.
pub fn apply_view<'a>(
    view: &ViewConfig,
    rows: &'a [Row],
    fields: &'a [FieldDefinition],
) -> ComposedView<'a> {
    let filtered = filter_rows(rows, &view.filters, fields);
    compose_refs(view, filtered, fields)
}

/// Composes a view over an already-filtered row view.
///
/// Used by the engine after the unscoped-search stage has narrowed the rows.
pub(crate) fn compose_refs<'a>(
    view: &ViewConfig,
    rows: Vec<&'a Row>,
    fields: &'a [FieldDefinition],
) -> ComposedView<'a> {
    let visible_fields: Vec<&FieldDefinition> = view
        .columns
        .iter()
        .filter_map(|id| find_field(fields, id))
        .collect();

    let ordered = sort_refs(rows, view.sort_by.as_ref(), fields);

    let groups = view
        .group_by
        .as_deref()
        .and_then(|id| find_field(fields, id))
        .map(|field| group_rows(&ordered, field));

    ComposedView {
        visible_fields,
        rows: ordered,
        groups,
    }
}

/// Partitions rows into groups keyed by the field's display value, in order
/// of first appearance within the effective row order.
pub fn group_rows<'a>(rows: &[&'a Row], field: &FieldDefinition) -> Vec<RowGroup<'a>> {
    let mut groups: Vec<RowGroup<'a>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let key = display_value(row.get(&field.id), field);
        match index.get(&key) {
            Some(&i) => groups[i].rows.push(row),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(RowGroup {
                    key,
                    rows: vec![row],
                });
            }
        }
    }
    groups
}
