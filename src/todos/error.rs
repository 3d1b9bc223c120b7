//! Error types shared by the service, the repositories and the tag search.

/// Errors produced while reading or mutating todos.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TodoError {
    /// The caller supplied an identifier or payload that cannot be accepted.
    #[error("validation error: {0}")]
    Validation(String),

    /// No todo exists for the given identifier.
    #[error("not found todo with id: {0}")]
    NotFound(String),

    /// The underlying repository failed.
    #[error("store error: {0}")]
    Store(String),

    /// A todo with the same identifier already exists.
    #[error("a todo with id {0} already exists")]
    Conflict(String),

    /// The operation was cancelled by its caller before it completed.
    #[error("operation cancelled: {0}")]
    Cancelled(String),
}

impl TodoError {
    /// Build a store error from anything displayable.
    pub fn store(err: impl std::fmt::Display) -> Self {
        Self::Store(err.to_string())
    }

    /// Whether the failure was caused by the caller rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::NotFound(_) | Self::Conflict(_)
        )
    }
}

impl From<rusqlite::Error> for TodoError {
    fn from(err: rusqlite::Error) -> Self {
        Self::store(err)
    }
}

/// Convenience alias for todo operations.
pub type Result<T> = std::result::Result<T, TodoError>;
