//! The table engine: one controller owning all interaction state.

use log::debug;
use serde::Deserialize;
use serde::Serialize;

use crate::error::StateError;
use crate::error::ViewError;
use crate::fill::BulkUpdateEvent;
use crate::fill::DragFill;
use crate::model::CellValue;
use crate::model::FieldDefinition;
use crate::model::Row;
use crate::model::find_field;
use crate::persist::PersistedTableState;
use crate::persist::StateStore;
use crate::query::FilterConfig;
use crate::query::SortConfig;
use crate::query::filter_refs;
use crate::query::search_rows;
use crate::selection::CellRef;
use crate::selection::RowSelectionChange;
use crate::selection::SelectionState;
use crate::view::ComposedView;
use crate::view::ViewConfig;
use crate::view::compose_refs;

/// A committed cell edit, for the host to apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellEditIntent {
    /// The edited row id.
    pub row_id: String,
    /// The edited field id.
    pub field_id: String,
    /// The new value.
    pub value: CellValue,
}

/// The engine controller.
///
/// Owns selection, drag-fill, editing, and view state; rows and field
/// definitions stay caller-owned and are passed in as read-only snapshots
/// per call. Every operation is a pure, immediately-completing function
/// call with no background work and no suspension points.
///
/// # Example
///
/// ```
/// use tablekit_lib::TableEngine;
/// use tablekit_lib::model::{FieldDefinition, FieldType, Row};
/// use tablekit_lib::query::SortConfig;
/// use tablekit_lib::view::ViewConfig;
///
/// let fields = vec![
///     FieldDefinition::new("title", "Title", FieldType::Title),
///     FieldDefinition::new("points", "Points", FieldType::Number),
/// ];
/// let rows = vec![
///     Row::new("r1").set("title", "Beta").set("points", 2),
///     Row::new("r2").set("title", "Alpha").set("points", 5),
/// ];
/// let view = ViewConfig::new("All")
///     .with_columns(vec!["title", "points"])
///     .with_sort(SortConfig::asc("title"));
///
/// let engine = TableEngine::with_views(vec![view]);
/// let composed = engine.compose(&rows, &fields);
/// assert_eq!(composed.rows[0].id, "r2");
/// ```
#[derive(Debug, Default)]
pub struct TableEngine {
    views: Vec<ViewConfig>,
    active_view_id: Option<String>,
    selection: SelectionState,
    fill: DragFill,
    editing_cell: Option<CellRef>,
    search_term: String,
    table_id: Option<String>,
}

impl TableEngine {
    /// Creates an engine with no views.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with the given views, activating the first.
    pub fn with_views(views: Vec<ViewConfig>) -> Self {
        let active_view_id = views.first().map(|v| v.id.clone());
        Self {
            views,
            active_view_id,
            ..Self::default()
        }
    }

    /// Sets the table identifier used to namespace persisted state.
    pub fn with_table_id(mut self, table_id: impl Into<String>) -> Self {
        self.table_id = Some(table_id.into());
        self
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Returns all registered views.
    pub fn views(&self) -> &[ViewConfig] {
        &self.views
    }

    /// Returns the active view, if any.
    pub fn active_view(&self) -> Option<&ViewConfig> {
        let id = self.active_view_id.as_deref()?;
        self.views.iter().find(|v| v.id == id)
    }

    /// Registers a view. The first registered view becomes active.
    pub fn add_view(&mut self, view: ViewConfig) {
        if self.active_view_id.is_none() {
            self.active_view_id = Some(view.id.clone());
        }
        self.views.push(view);
    }

    /// Removes a view by id, deactivating it if it was active.
    pub fn remove_view(&mut self, id: &str) {
        self.views.retain(|v| v.id != id);
        if self.active_view_id.as_deref() == Some(id) {
            self.active_view_id = self.views.first().map(|v| v.id.clone());
        }
    }

    /// Activates a view by id.
    ///
    /// The switch is atomic: columns, filters, sort, and grouping all change
    /// together in one transition.
    pub fn set_active_view(&mut self, id: &str) -> Result<&ViewConfig, ViewError> {
        let Some(pos) = self.views.iter().position(|v| v.id == id) else {
            return Err(ViewError::unknown(id));
        };
        self.active_view_id = Some(id.to_string());
        debug!("active view switched to '{}'", self.views[pos].name);
        Ok(&self.views[pos])
    }

    fn active_view_mut(&mut self) -> Option<&mut ViewConfig> {
        let id = self.active_view_id.clone()?;
        self.views.iter_mut().find(|v| v.id == id)
    }

    // =========================================================================
    // Write-back onto the active view
    //
    // Toggles and reorders performed while a view is active are written into
    // that view, so the composed state and the named view never diverge.
    // =========================================================================

    /// Sets the active view's sort directive. Returns `false` with no
    /// active view.
    pub fn set_sort(&mut self, sort: Option<SortConfig>) -> bool {
        match self.active_view_mut() {
            Some(view) => {
                view.sort_by = sort;
                debug!("sort directive written back to view '{}'", view.name);
                true
            }
            None => false,
        }
    }

    /// Replaces the active view's column list.
    pub fn set_columns<S: Into<String>>(&mut self, columns: Vec<S>) -> bool {
        match self.active_view_mut() {
            Some(view) => {
                view.columns = columns.into_iter().map(Into::into).collect();
                true
            }
            None => false,
        }
    }

    /// Toggles a column's visibility in the active view: removes it if
    /// present, appends it otherwise.
    pub fn toggle_column(&mut self, field_id: &str) -> bool {
        match self.active_view_mut() {
            Some(view) => {
                match view.columns.iter().position(|c| c == field_id) {
                    Some(pos) => {
                        view.columns.remove(pos);
                    }
                    None => view.columns.push(field_id.to_string()),
                }
                true
            }
            None => false,
        }
    }

    /// Moves a column to a new index in the active view's order.
    pub fn move_column(&mut self, field_id: &str, to_index: usize) -> bool {
        match self.active_view_mut() {
            Some(view) => {
                let Some(pos) = view.columns.iter().position(|c| c == field_id) else {
                    return false;
                };
                let column = view.columns.remove(pos);
                let to_index = to_index.min(view.columns.len());
                view.columns.insert(to_index, column);
                true
            }
            None => false,
        }
    }

    /// Replaces the active view's filter list.
    pub fn set_filters(&mut self, filters: Vec<FilterConfig>) -> bool {
        match self.active_view_mut() {
            Some(view) => {
                view.filters = filters;
                true
            }
            None => false,
        }
    }

    /// Sets the active view's group-by field.
    pub fn set_group_by(&mut self, field: Option<String>) -> bool {
        match self.active_view_mut() {
            Some(view) => {
                view.group_by = field;
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Composition
    // =========================================================================

    /// Sets the unscoped search term. Debouncing keystrokes into one call is
    /// host policy.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Returns the current search term.
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Composes the effective visible/ordered/filtered state for one
    /// row/field snapshot: search first, then the active view's filters,
    /// sort, and grouping.
    ///
    /// With no active view, all visible catalog fields show in declaration
    /// order and only the search term narrows the rows.
    pub fn compose<'a>(&self, rows: &'a [Row], fields: &'a [FieldDefinition]) -> ComposedView<'a> {
        let searched = search_rows(rows, &self.search_term, fields);
        match self.active_view() {
            Some(view) => {
                let filtered = filter_refs(searched, &view.filters, fields);
                compose_refs(view, filtered, fields)
            }
            None => ComposedView {
                visible_fields: fields.iter().filter(|f| f.visible).collect(),
                rows: searched,
                groups: None,
            },
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Returns the selection state.
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Selects a cell, replacing any prior cell selection.
    pub fn select_cell(&mut self, row_id: &str, field_id: &str) {
        self.selection.select_cell(row_id, field_id);
    }

    /// Clears the cell selection.
    pub fn clear_cell(&mut self) {
        self.selection.clear_cell();
    }

    /// Plain row click.
    pub fn click_row(&mut self, id: &str) -> RowSelectionChange {
        self.selection.click_row(id)
    }

    /// Ctrl/cmd row click.
    pub fn toggle_row(&mut self, id: &str) -> RowSelectionChange {
        self.selection.toggle_row(id)
    }

    /// Shift row click against the current visible order.
    pub fn shift_click_row(&mut self, id: &str, rows_in_order: &[&Row]) -> RowSelectionChange {
        let ordered_ids: Vec<String> = rows_in_order.iter().map(|r| r.id.clone()).collect();
        self.selection.shift_click_row(id, &ordered_ids)
    }

    /// Clears the row selection.
    pub fn clear_row_selection(&mut self) -> RowSelectionChange {
        self.selection.clear_rows()
    }

    /// Reconciles selection state after caller-side row removal or
    /// replacement.
    pub fn sync_rows(&mut self, rows: &[Row]) {
        self.selection
            .retain_rows(|id| rows.iter().any(|r| r.id == id));
        if let Some(cell) = self.editing_cell.as_ref()
            && !rows.iter().any(|r| r.id == cell.row_id)
        {
            self.editing_cell = None;
        }
    }

    // =========================================================================
    // Editing
    //
    // The host decides which input events trigger commit/cancel (enter,
    // escape, click-outside); the engine only tracks the editing cell and
    // emits the intent.
    // =========================================================================

    /// Returns the cell being edited, if any.
    pub fn editing_cell(&self) -> Option<&CellRef> {
        self.editing_cell.as_ref()
    }

    /// Begins editing a cell, selecting it as well.
    pub fn begin_edit(&mut self, row_id: &str, field_id: &str) {
        self.selection.select_cell(row_id, field_id);
        self.editing_cell = Some(CellRef::new(row_id, field_id));
    }

    /// Commits the in-progress edit, emitting the intent for the host to
    /// apply. No edit in progress → `None`.
    pub fn commit_edit(&mut self, value: impl Into<CellValue>) -> Option<CellEditIntent> {
        let cell = self.editing_cell.take()?;
        Some(CellEditIntent {
            row_id: cell.row_id,
            field_id: cell.field_id,
            value: value.into(),
        })
    }

    /// Cancels the in-progress edit without emitting anything.
    pub fn cancel_edit(&mut self) {
        self.editing_cell = None;
    }

    // =========================================================================
    // Drag-fill
    // =========================================================================

    /// Starts a drag-fill gesture; an open session is discarded first.
    pub fn begin_fill(&mut self, row_id: &str, field_id: &str) {
        self.fill.begin(row_id, field_id);
    }

    /// Extends the open drag-fill gesture against the current visible order.
    pub fn extend_fill(&mut self, row_id: &str, field_id: &str, rows_in_order: &[&Row]) {
        self.fill.extend(row_id, field_id, rows_in_order);
    }

    /// Ends the drag-fill gesture, emitting the batched update if the drag
    /// covered any rows beyond the source.
    pub fn end_fill(
        &mut self,
        rows_in_order: &[&Row],
        fields: &[FieldDefinition],
    ) -> Option<BulkUpdateEvent> {
        self.fill.end(rows_in_order, fields)
    }

    /// Returns the open drag-fill target ids (source first), if any.
    pub fn fill_target_row_ids(&self) -> Option<&[String]> {
        self.fill.target_row_ids()
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Saves the active view's field order and sort directive under the
    /// engine's table identifier. Without a table identifier or an active
    /// view this is a no-op.
    pub fn save_state(&self, store: &mut dyn StateStore) -> Result<(), StateError> {
        let (Some(table_id), Some(view)) = (self.table_id.as_deref(), self.active_view()) else {
            return Ok(());
        };
        let state = PersistedTableState {
            field_order: view.columns.clone(),
            sort_by: view.sort_by.clone(),
        };
        debug!("saving table state for '{table_id}'");
        store.save(table_id, &state)
    }

    /// Restores the persisted field order and sort directive onto the
    /// active view, to run before first compose. Field ids no longer in the
    /// catalog are dropped. Returns `true` when a stored state was applied.
    pub fn restore_state(
        &mut self,
        store: &dyn StateStore,
        fields: &[FieldDefinition],
    ) -> Result<bool, StateError> {
        let Some(table_id) = self.table_id.clone() else {
            return Ok(false);
        };
        let Some(state) = store.load(&table_id)? else {
            return Ok(false);
        };
        let Some(view) = self.active_view_mut() else {
            return Ok(false);
        };
        view.columns = state
            .field_order
            .into_iter()
            .filter(|id| find_field(fields, id).is_some())
            .collect();
        view.sort_by = state.sort_by;
        debug!("restored table state for '{table_id}'");
        Ok(true)
    }
}
