//! Persisted per-table view state.
//!
//! The engine exposes plain serializable state; whatever layer writes it to
//! durable storage is external. A [`StateStore`] implementation bridges the
//! two: states are namespaced by a caller-supplied table identifier so
//! multiple grid instances never collide.

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use crate::error::StateError;
use crate::query::SortConfig;

/// The durable slice of a table's view composition.
///
/// On reload the composer reproduces the same visible-field ordering and
/// re-applies the same sort directive before first render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedTableState {
    /// Field visibility order.
    pub field_order: Vec<String>,
    /// The active sort directive, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortConfig>,
}

/// Backend trait for per-table state storage.
///
/// Implementations handle keyed storage/retrieval of encoded states; the
/// engine handles the typed serialization on top.
pub trait StateStore {
    /// Loads the state for a table identifier, if present.
    fn load(&self, table_id: &str) -> Result<Option<PersistedTableState>, StateError>;

    /// Saves the state for a table identifier.
    fn save(&mut self, table_id: &str, state: &PersistedTableState) -> Result<(), StateError>;

    /// Removes the state for a table identifier.
    fn remove(&mut self, table_id: &str) -> Result<(), StateError>;
}

/// An in-memory state store backed by a hash map of JSON-encoded entries.
///
/// This is the default implementation; data is lost when the process exits.
/// Hosts that want durability implement [`StateStore`] over their own
/// storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    entries: HashMap<String, String>,
}

impl MemoryStateStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored table states.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self, table_id: &str) -> Result<Option<PersistedTableState>, StateError> {
        match self.entries.get(table_id) {
            None => Ok(None),
            Some(raw) => serde_json::from_str(raw)
                .map(Some)
                .map_err(StateError::Decode),
        }
    }

    fn save(&mut self, table_id: &str, state: &PersistedTableState) -> Result<(), StateError> {
        let raw = serde_json::to_string(state).map_err(StateError::Encode)?;
        self.entries.insert(table_id.to_string(), raw);
        Ok(())
    }

    fn remove(&mut self, table_id: &str) -> Result<(), StateError> {
        self.entries.remove(table_id);
        Ok(())
    }
}
