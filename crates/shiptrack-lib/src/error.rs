use thiserror::Error;

/// Convenient result alias for the shiptrack library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when no shipment exists for the requested identifier.
    #[error("shipment {id} not found")]
    NotFound { id: i64 },

    /// Raised when a field value violates a constraint, before any write.
    #[error("invalid value for '{field}': {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Raised when a tracking number collides with an existing record.
    #[error("tracking number '{tracking_number}' is already in use")]
    DuplicateTrackingNumber { tracking_number: String },

    /// Wrapper for SQLite errors.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

impl Error {
    /// Shorthand for a validation error on a named field.
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}
