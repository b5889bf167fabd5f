//! Error types for the task subsystem.
//!
//! [`TaskError`] is the primary error type returned by all task and tag
//! operations. `TaskNotFound` and `InvalidArgument` are contract errors the
//! API layer translates into client responses; the remaining variants are
//! internal failures.

use thiserror::Error;

/// Errors that can occur during task store operations.
#[derive(Debug, Error)]
pub enum TaskError {
    /// `SQLite` database error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Requested task does not exist or has been soft-deleted.
    #[error("task not found: {0}")]
    TaskNotFound(i64),

    /// Structurally invalid input reaching the store (e.g. priority out of
    /// range, empty tag name after trimming).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Schema migration failed.
    #[error("migration error: {message}")]
    Migration {
        /// Describes which migration failed and why.
        message: String,
    },

    /// Internal error that should not occur in normal operation.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TaskError {
    /// Create an invalid-argument error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Convenience type alias for task store results.
pub type Result<T> = std::result::Result<T, TaskError>;

/// Whether a `rusqlite` error is a constraint violation (e.g. the
/// case-insensitive unique index on tag names).
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
