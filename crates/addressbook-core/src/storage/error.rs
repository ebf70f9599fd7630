//! Storage error handling
//!
//! Typed errors for contact store operations. Callers branch on the
//! variant: a missing record is never reported as a storage failure.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::ContactId;

/// Errors that can occur during store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing database file or table cannot be opened or created
    #[error("Storage unavailable at '{path}': {source}")]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Failed to create the data directory
    #[error("Failed to create data directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Target of an update does not exist
    #[error("Contact {id} not found")]
    NotFound { id: ContactId },

    /// Create was called with an id that is already stored
    #[error("Contact {id} already exists")]
    DuplicateKey { id: ContactId },

    /// A stored row could not be turned into a contact
    #[error("Contact {id} has invalid stored data: {details}")]
    InvalidRow { id: ContactId, details: String },

    /// SQLite error on an individual statement
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl StoreError {
    /// Check if retrying the operation may succeed
    ///
    /// Missing and duplicate records are caller errors; everything else is
    /// a storage fault.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StoreError::StorageUnavailable { .. } | StoreError::Database(_)
        )
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StoreError::StorageUnavailable { .. } => {
                Some("Check that the data directory is writable and not on a full disk.")
            }
            StoreError::CreateDirectory { .. } => {
                Some("Check that the parent directory exists and you have write permissions.")
            }
            StoreError::DuplicateKey { .. } => {
                Some("Ask the store for the next id and try again.")
            }
            _ => None,
        }
    }

    /// Whether this is a unique/primary key violation reported by SQLite
    pub(crate) fn is_constraint_violation(error: &rusqlite::Error) -> bool {
        matches!(
            error,
            rusqlite::Error::SqliteFailure(e, _)
                if e.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
