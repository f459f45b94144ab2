//! Error types for the timetable store.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The stored document list could not be (de)serialized
    #[error("Stored document error: {0}")]
    Document(#[from] serde_json::Error),

    #[error("No saved timetable with id {0:?}")]
    NotFound(String),
}
