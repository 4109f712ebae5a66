//! Error types for the tabling library.
//!
//! This module provides the error hierarchy for all reservation and table
//! allocation operations, using `thiserror` for ergonomic error handling.

use std::path::PathBuf;

use thiserror::Error;

use crate::reservation::ReservationStatus;
use crate::table::TableId;

/// Result type alias for operations that may fail with a tabling error.
///
/// # Examples
///
/// ```
/// use tabling::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(5)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the tabling library.
#[derive(Debug, Error)]
pub enum Error {
    /// An invalid filesystem path was provided.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The invalid path.
        path: PathBuf,
        /// The reason the path is invalid.
        reason: String,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// The requested resource was not found.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// A reservation cannot move between the two statuses.
    #[error("invalid reservation transition: {from} -> {to}")]
    InvalidTransition {
        /// The current status.
        from: ReservationStatus,
        /// The requested status.
        to: ReservationStatus,
    },

    /// A table cannot be assigned because something else still claims it.
    #[error("table {table} unavailable: {reason}")]
    TableUnavailable {
        /// The contested table.
        table: TableId,
        /// Why the table cannot be assigned.
        reason: String,
    },

    /// A booking overlaps another active reservation.
    #[error("reservation conflict: {details}")]
    ReservationConflict {
        /// Details about the conflict.
        details: String,
    },

    /// A database lock timeout occurred.
    #[error("database lock timeout after {seconds}s")]
    LockTimeout {
        /// The number of seconds waited before timing out.
        seconds: u64,
    },

    /// The data directory was not found and auto-initialization is disabled.
    #[error("data directory not found: {}", path.display())]
    DataDirectoryNotFound {
        /// The expected path to the data directory.
        path: PathBuf,
    },

    /// Database corruption was detected.
    #[error("database corruption detected: {details}")]
    DatabaseCorruption {
        /// Details about the corruption.
        details: String,
    },

    /// An unsupported schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: u32,
        /// The schema version found in the database.
        found: u32,
    },
}

impl From<crate::table::InvalidTableError> for Error {
    fn from(err: crate::table::InvalidTableError) -> Self {
        Self::Validation {
            field: err.field,
            message: err.reason,
        }
    }
}

impl From<crate::reservation::ValidationError> for Error {
    fn from(err: crate::reservation::ValidationError) -> Self {
        Self::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

impl Error {
    /// Maps a `rusqlite` error, turning lock contention into [`Error::LockTimeout`].
    ///
    /// `SQLITE_BUSY` and `SQLITE_LOCKED` are only returned once the busy
    /// timeout has been exhausted, so `waited` is reported as the timeout.
    #[must_use]
    pub fn from_sqlite(err: rusqlite::Error, waited: std::time::Duration) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref failure, _)
                if matches!(
                    failure.code,
                    rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
                ) =>
            {
                Self::LockTimeout {
                    seconds: waited.as_secs(),
                }
            }
            other => Self::Database(other),
        }
    }

    /// Check if the error is a business-rule refusal rather than a failure.
    ///
    /// Refusals are expected during service: a guest cannot be seated on a
    /// claimed table, a booking overlaps another, a cancelled reservation
    /// cannot be seated.
    ///
    /// # Examples
    ///
    /// ```
    /// use tabling::Error;
    ///
    /// let err = Error::ReservationConflict { details: "table 5 is booked".into() };
    /// assert!(err.is_refusal());
    /// ```
    #[must_use]
    pub fn is_refusal(&self) -> bool {
        matches!(
            self,
            Self::InvalidTransition { .. }
                | Self::TableUnavailable { .. }
                | Self::ReservationConflict { .. }
        )
    }
}
