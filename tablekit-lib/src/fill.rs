//! Drag-fill: column-wise value propagation.
//!
//! A drag-fill gesture copies one cell's value down a contiguous run of rows
//! in the same column. The session lives only for the duration of the
//! gesture; `end` converts it into a [`BulkUpdateEvent`], a description of
//! the propagation for the host to apply, never a mutation performed here.

use log::debug;
use log::trace;
use serde::Deserialize;
use serde::Serialize;

use crate::model::CellValue;
use crate::model::FieldDefinition;
use crate::model::Row;
use crate::model::find_field;
use crate::selection::CellRef;

/// One target cell of a bulk update, with its value at emission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellPatch {
    /// The target row id.
    pub row_id: String,
    /// The target field id.
    pub field_id: String,
    /// The cell's current value, read when the event was emitted.
    pub current_value: CellValue,
}

/// A batched bulk-update description produced by ending a drag-fill.
///
/// Applying the update is the host's responsibility; the engine only
/// describes the target set and the value to propagate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkUpdateEvent {
    /// The cell the drag started from.
    pub source: CellRef,
    /// The source cell's value to propagate.
    pub value: CellValue,
    /// The target cells, in visible order, source excluded.
    pub targets: Vec<CellPatch>,
    /// The field the fill ran over.
    pub field: FieldDefinition,
}

#[derive(Debug, Clone)]
struct FillSession {
    source: CellRef,
    /// Contiguous target ids, source first, in visible order.
    target_row_ids: Vec<String>,
}

/// Drag-fill session state machine.
///
/// Gesture callbacks arrive strictly as `begin` → `extend`* → `end` for one
/// gesture; `extend` and `end` without an open session are silent no-ops.
/// Abandoning a gesture is simply never calling `end` (or calling
/// [`DragFill::cancel`]).
#[derive(Debug, Clone, Default)]
pub struct DragFill {
    session: Option<FillSession>,
}

impl DragFill {
    /// Creates an idle drag-fill engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if a gesture is in progress.
    pub fn active(&self) -> bool {
        self.session.is_some()
    }

    /// Returns the current target row ids (source first), if a gesture is
    /// in progress.
    pub fn target_row_ids(&self) -> Option<&[String]> {
        self.session.as_ref().map(|s| s.target_row_ids.as_slice())
    }

    /// Starts a gesture from the source cell. The target set is seeded with
    /// just the source. An already-open session is discarded first.
    pub fn begin(&mut self, row_id: impl Into<String>, field_id: impl Into<String>) {
        let source = CellRef::new(row_id, field_id);
        let target_row_ids = vec![source.row_id.clone()];
        self.session = Some(FillSession {
            source,
            target_row_ids,
        });
    }

    /// Extends the gesture to a cell, given the current visible row order.
    ///
    /// The fill is column-only and downward-only: the extension is ignored
    /// unless the field matches the source field and the target row sits
    /// strictly below the source row. A valid extension recomputes the
    /// target set from scratch as the contiguous range from source to
    /// target, so dragging back up shrinks the set symmetrically.
    pub fn extend(&mut self, row_id: &str, field_id: &str, rows_in_order: &[&Row]) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if field_id != session.source.field_id {
            return;
        }
        let source_index = rows_in_order
            .iter()
            .position(|r| r.id == session.source.row_id);
        let target_index = rows_in_order.iter().position(|r| r.id == row_id);
        let (Some(source_index), Some(target_index)) = (source_index, target_index) else {
            return;
        };
        if target_index <= source_index {
            return;
        }
        session.target_row_ids = rows_in_order[source_index..=target_index]
            .iter()
            .map(|r| r.id.clone())
            .collect();
        trace!(
            "drag-fill extended to {} rows in column {}",
            session.target_row_ids.len(),
            session.source.field_id
        );
    }

    /// Ends the gesture and converts it into a [`BulkUpdateEvent`].
    ///
    /// Target values are read at emission time, not at drag-start time.
    /// Returns `None` when the drag never left the source cell (or no
    /// session is open). The session is torn down unconditionally.
    pub fn end(
        &mut self,
        rows_in_order: &[&Row],
        fields: &[FieldDefinition],
    ) -> Option<BulkUpdateEvent> {
        let session = self.session.take()?;
        let field = find_field(fields, &session.source.field_id)?;

        let value = rows_in_order
            .iter()
            .find(|r| r.id == session.source.row_id)
            .and_then(|r| r.get(&field.id))
            .cloned()
            .unwrap_or(CellValue::Null);

        let targets: Vec<CellPatch> = session
            .target_row_ids
            .iter()
            .filter(|id| **id != session.source.row_id)
            .filter_map(|id| {
                let row = rows_in_order.iter().find(|r| r.id == *id)?;
                Some(CellPatch {
                    row_id: row.id.clone(),
                    field_id: field.id.clone(),
                    current_value: row.get(&field.id).cloned().unwrap_or(CellValue::Null),
                })
            })
            .collect();

        if targets.is_empty() {
            return None;
        }
        debug!(
            "drag-fill emitting bulk update: {} targets in column {}",
            targets.len(),
            field.id
        );
        Some(BulkUpdateEvent {
            source: session.source,
            value,
            targets,
            field: field.clone(),
        })
    }

    /// Discards the open session, if any.
    pub fn cancel(&mut self) {
        self.session = None;
    }
}
