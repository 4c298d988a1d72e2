//! Selection state for cells and rows.
//!
//! Selection uses string IDs for stability across sorts and filters. Cell
//! selection and row selection are independent axes: focusing a cell does not
//! clear row checkboxes and vice versa. All gesture handlers are pure
//! synchronous transitions; any renderer (retained-mode, immediate-mode, or
//! headless test) can drive them through the same calls.

use serde::Deserialize;
use serde::Serialize;

use crate::model::Row;

/// A reference to one cell: row id plus field id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRef {
    /// The row id.
    pub row_id: String,
    /// The field id.
    pub field_id: String,
}

impl CellRef {
    /// Creates a new cell reference.
    pub fn new(row_id: impl Into<String>, field_id: impl Into<String>) -> Self {
        Self {
            row_id: row_id.into(),
            field_id: field_id.into(),
        }
    }
}

/// The gesture that produced a row-selection change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RowSelectAction {
    /// Plain click: single row replaced the selection.
    Select,
    /// Ctrl/cmd-click: membership toggled.
    Multi,
    /// Shift-click: contiguous range derived from the anchor.
    Range,
}

/// Emitted after every row-selection gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowSelectionChange {
    /// The selected row ids, in visible order for ranges and in selection
    /// order for toggles.
    pub selected_row_ids: Vec<String>,
    /// The gesture that produced this change.
    pub last_action: RowSelectAction,
}

/// Cell and row selection state with anchor semantics.
///
/// Invariants:
/// - at most one cell is selected, enforced by replacement;
/// - the anchor moves only on a plain click or the first click of a fresh
///   selection, never on a shift-extension;
/// - a shift-click re-derives the whole range from the anchor instead of
///   accumulating, so repeated shift-clicks from one anchor never grow the
///   set beyond the current range.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    selected_cell: Option<CellRef>,
    selected_row_ids: Vec<String>,
    anchor_row_id: Option<String>,
}

impl SelectionState {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Cell axis
    // -------------------------------------------------------------------------

    /// Selects a cell, replacing any prior cell selection.
    pub fn select_cell(&mut self, row_id: impl Into<String>, field_id: impl Into<String>) {
        self.selected_cell = Some(CellRef::new(row_id, field_id));
    }

    /// Clears the cell selection.
    pub fn clear_cell(&mut self) {
        self.selected_cell = None;
    }

    /// Returns the selected cell, if any.
    pub fn selected_cell(&self) -> Option<&CellRef> {
        self.selected_cell.as_ref()
    }

    // -------------------------------------------------------------------------
    // Row axis
    // -------------------------------------------------------------------------

    /// Returns the selected row ids.
    pub fn selected_row_ids(&self) -> &[String] {
        &self.selected_row_ids
    }

    /// Returns `true` if the row is selected.
    pub fn is_row_selected(&self, id: &str) -> bool {
        self.selected_row_ids.iter().any(|s| s == id)
    }

    /// Returns the anchor row id for range selection, if any.
    pub fn anchor(&self) -> Option<&str> {
        self.anchor_row_id.as_deref()
    }

    /// Resolves the selected ids against a row snapshot, preserving
    /// selection order and skipping ids the snapshot no longer has.
    pub fn selected_rows<'a>(&self, rows: &'a [Row]) -> Vec<&'a Row> {
        self.selected_row_ids
            .iter()
            .filter_map(|id| rows.iter().find(|r| r.id == *id))
            .collect()
    }

    /// Plain click: selects exactly that row and stores it as the new anchor.
    pub fn click_row(&mut self, id: &str) -> RowSelectionChange {
        self.selected_row_ids = vec![id.to_string()];
        self.anchor_row_id = Some(id.to_string());
        self.change(RowSelectAction::Select)
    }

    /// Ctrl/cmd-click: toggles the row's membership without moving the
    /// anchor, except when this is the first click of a fresh selection.
    pub fn toggle_row(&mut self, id: &str) -> RowSelectionChange {
        let fresh = self.selected_row_ids.is_empty();
        if let Some(pos) = self.selected_row_ids.iter().position(|s| s == id) {
            self.selected_row_ids.remove(pos);
        } else {
            self.selected_row_ids.push(id.to_string());
        }
        if fresh || self.anchor_row_id.is_none() {
            self.anchor_row_id = Some(id.to_string());
        }
        self.change(RowSelectAction::Multi)
    }

    /// Shift-click: selects the contiguous range between the anchor and the
    /// clicked row (inclusive) in the supplied visible order, replacing the
    /// prior row selection. The anchor does not move.
    ///
    /// With no usable anchor this degrades to a plain click.
    pub fn shift_click_row(&mut self, id: &str, ordered_ids: &[String]) -> RowSelectionChange {
        let anchor_pos = self
            .anchor_row_id
            .as_ref()
            .and_then(|anchor| ordered_ids.iter().position(|o| o == anchor));
        let target_pos = ordered_ids.iter().position(|o| o == id);

        let (Some(anchor_pos), Some(target_pos)) = (anchor_pos, target_pos) else {
            return self.click_row(id);
        };

        let (start, end) = if anchor_pos <= target_pos {
            (anchor_pos, target_pos)
        } else {
            (target_pos, anchor_pos)
        };
        self.selected_row_ids = ordered_ids[start..=end].to_vec();
        self.change(RowSelectAction::Range)
    }

    /// Clears the row selection and anchor.
    pub fn clear_rows(&mut self) -> RowSelectionChange {
        self.selected_row_ids.clear();
        self.anchor_row_id = None;
        self.change(RowSelectAction::Select)
    }

    /// Drops selection entries whose rows no longer exist.
    ///
    /// Run after caller-side row deletion so the selection never holds
    /// dangling ids. Clears the anchor and the selected cell when their row
    /// is gone.
    pub fn retain_rows<F: Fn(&str) -> bool>(&mut self, keep: F) {
        self.selected_row_ids.retain(|id| keep(id));
        if let Some(anchor) = self.anchor_row_id.as_deref()
            && !keep(anchor)
        {
            self.anchor_row_id = None;
        }
        if let Some(cell) = self.selected_cell.as_ref()
            && !keep(&cell.row_id)
        {
            self.selected_cell = None;
        }
    }

    fn change(&self, last_action: RowSelectAction) -> RowSelectionChange {
        RowSelectionChange {
            selected_row_ids: self.selected_row_ids.clone(),
            last_action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("row{i}")).collect()
    }

    #[test]
    fn test_at_most_one_cell_selected() {
        let mut sel = SelectionState::new();
        sel.select_cell("r1", "title");
        sel.select_cell("r2", "points");
        assert_eq!(sel.selected_cell(), Some(&CellRef::new("r2", "points")));
        sel.clear_cell();
        assert_eq!(sel.selected_cell(), None);
    }

    #[test]
    fn test_cell_and_row_axes_are_independent() {
        let mut sel = SelectionState::new();
        sel.click_row("row1");
        sel.select_cell("row2", "title");
        assert_eq!(sel.selected_row_ids(), ["row1".to_string()]);
        assert!(sel.selected_cell().is_some());
    }

    #[test]
    fn test_plain_click_replaces_and_anchors() {
        let mut sel = SelectionState::new();
        sel.click_row("row1");
        let change = sel.click_row("row3");
        assert_eq!(change.selected_row_ids, ["row3".to_string()]);
        assert_eq!(change.last_action, RowSelectAction::Select);
        assert_eq!(sel.anchor(), Some("row3"));
    }

    #[test]
    fn test_toggle_keeps_anchor() {
        let mut sel = SelectionState::new();
        sel.click_row("row1");
        sel.toggle_row("row3");
        sel.toggle_row("row4");
        assert_eq!(sel.anchor(), Some("row1"));
        assert_eq!(
            sel.selected_row_ids(),
            ["row1".to_string(), "row3".to_string(), "row4".to_string()]
        );
        let change = sel.toggle_row("row3");
        assert_eq!(
            change.selected_row_ids,
            ["row1".to_string(), "row4".to_string()]
        );
        assert_eq!(change.last_action, RowSelectAction::Multi);
    }

    #[test]
    fn test_toggle_on_fresh_selection_seeds_anchor() {
        let mut sel = SelectionState::new();
        sel.toggle_row("row2");
        assert_eq!(sel.anchor(), Some("row2"));
    }

    #[test]
    fn test_shift_click_selects_inclusive_range() {
        let order = order(5);
        let mut sel = SelectionState::new();
        sel.click_row("row1");
        let change = sel.shift_click_row("row4", &order);
        assert_eq!(change.selected_row_ids, order[0..4].to_vec());
        assert_eq!(change.last_action, RowSelectAction::Range);
        assert_eq!(change.selected_row_ids.len(), 4);
    }

    #[test]
    fn test_range_is_symmetric() {
        let order = order(5);

        let mut down = SelectionState::new();
        down.click_row("row2");
        let d = down.shift_click_row("row5", &order);

        let mut up = SelectionState::new();
        up.click_row("row5");
        let mut u = up.shift_click_row("row2", &order);

        let mut d_ids = d.selected_row_ids.clone();
        d_ids.sort();
        u.selected_row_ids.sort();
        assert_eq!(d_ids, u.selected_row_ids);
    }

    #[test]
    fn test_shift_click_rederives_instead_of_accumulating() {
        let order = order(5);
        let mut sel = SelectionState::new();
        sel.click_row("row1");
        sel.shift_click_row("row5", &order);
        let change = sel.shift_click_row("row2", &order);
        assert_eq!(
            change.selected_row_ids,
            ["row1".to_string(), "row2".to_string()]
        );
        // Anchor never moved through the extensions.
        assert_eq!(sel.anchor(), Some("row1"));
    }

    #[test]
    fn test_shift_click_without_anchor_degrades_to_click() {
        let order = order(3);
        let mut sel = SelectionState::new();
        let change = sel.shift_click_row("row2", &order);
        assert_eq!(change.selected_row_ids, ["row2".to_string()]);
        assert_eq!(sel.anchor(), Some("row2"));
    }

    #[test]
    fn test_selected_rows_resolves_in_selection_order() {
        let rows = vec![Row::new("row1"), Row::new("row2"), Row::new("row3")];
        let mut sel = SelectionState::new();
        sel.click_row("row3");
        sel.toggle_row("row1");
        let resolved = sel.selected_rows(&rows);
        let ids: Vec<&str> = resolved.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["row3", "row1"]);
    }

    #[test]
    fn test_retain_rows_drops_dangling_state() {
        let mut sel = SelectionState::new();
        sel.click_row("row1");
        sel.toggle_row("row2");
        sel.select_cell("row2", "title");
        sel.retain_rows(|id| id != "row2");
        assert_eq!(sel.selected_row_ids(), ["row1".to_string()]);
        assert_eq!(sel.anchor(), Some("row1"));
        assert_eq!(sel.selected_cell(), None);

        sel.retain_rows(|_| false);
        assert!(sel.selected_row_ids().is_empty());
        assert_eq!(sel.anchor(), None);
    }
}
