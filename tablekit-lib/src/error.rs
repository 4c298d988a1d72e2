//! Error types
//!
//! The engine degrades gracefully on malformed data-plane input (stale field
//! ids, non-numeric operands, out-of-order gestures); none of those are
//! errors. `Result` appears only where a caller asks for something by id
//! that genuinely does not exist, or where the persistence codec fails.

/// Error type for view management operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ViewError {
    /// The requested view id is not registered.
    #[error("View '{id}' not found")]
    UnknownView { id: String },
}

impl ViewError {
    /// Creates a new unknown-view error.
    pub fn unknown(id: impl Into<String>) -> Self {
        Self::UnknownView { id: id.into() }
    }
}

/// Error type for persisted-state encoding and decoding.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// Encoding a table state to its stored form failed.
    #[error("Failed to encode table state: {0}")]
    Encode(#[source] serde_json::Error),

    /// Decoding a stored table state failed.
    #[error("Failed to decode table state: {0}")]
    Decode(#[source] serde_json::Error),
}
