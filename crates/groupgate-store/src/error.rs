//! Error types for groupgate storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Stored data failed a structural invariant.
    #[error("corrupt record: {0}")]
    Corrupt(String),

    /// Record not found.
    #[error("not found")]
    NotFound,
}
