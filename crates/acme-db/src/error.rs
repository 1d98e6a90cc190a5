//! Error taxonomy for sessions and the operations built on them.

use acme_types::Entity;
use rusqlite::ErrorCode;
use thiserror::Error;

use crate::pool::PoolError;

/// Errors returned by session and data-access operations.
///
/// Nothing is retried. Every variant propagates to the caller unchanged.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database could not be reached or opened.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Storage rejected a change because of a referential-integrity, check,
    /// or uniqueness constraint.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// An id-targeted operation found no row.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Which entity was looked up.
        entity: Entity,
        /// The id that had no row.
        id: i64,
    },

    /// The caller supplied arguments the operation cannot act on.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Any other SQLite failure.
    #[error("database error: {0}")]
    Database(rusqlite::Error),
}

impl StoreError {
    /// Returns `true` for the `NotFound` variant.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(ErrorCode::ConstraintViolation) => Self::ConstraintViolation(err.to_string()),
            Some(ErrorCode::CannotOpen) => Self::StorageUnavailable(err.to_string()),
            _ => Self::Database(err),
        }
    }
}

impl From<r2d2::Error> for StoreError {
    fn from(err: r2d2::Error) -> Self {
        Self::StorageUnavailable(err.to_string())
    }
}

impl From<PoolError> for StoreError {
    fn from(err: PoolError) -> Self {
        Self::StorageUnavailable(err.to_string())
    }
}
