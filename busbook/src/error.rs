//! Error types for the busbook library.
//!
//! This module provides the error hierarchy for all booking, rollover and
//! storage operations, using `thiserror` for ergonomic error handling.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type alias for operations that may fail with a busbook error.
///
/// # Examples
///
/// ```
/// use busbook::{Error, Result};
///
/// fn example_operation() -> Result<u16> {
///     Ok(12)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the busbook library.
///
/// Validation failures are raised before any write takes place. Conflicts
/// are never retried by the library. Storage failures are surfaced as-is.
#[derive(Debug, Error)]
pub enum Error {
    /// An invalid seat number was provided.
    #[error("invalid seat {value}: {reason}")]
    InvalidSeat {
        /// The invalid seat value.
        value: u16,
        /// The reason the seat is invalid.
        reason: String,
    },

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A seat/date slot is already held by another passenger.
    #[error("booking conflict: {details}")]
    Conflict {
        /// Details about the conflict.
        details: String,
    },

    /// The requested resource was not found.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
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

    /// An unsupported schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: u32,
        /// The schema version found in the database.
        found: u32,
    },
}

impl From<crate::seat::InvalidSeatError> for Error {
    fn from(err: crate::seat::InvalidSeatError) -> Self {
        Self::InvalidSeat {
            value: err.value,
            reason: err.reason,
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
    /// Converts a storage error, turning lock contention into
    /// [`Error::LockTimeout`].
    ///
    /// `busy_timeout` is the wait configured on the connection that failed.
    #[must_use]
    pub fn from_database(err: rusqlite::Error, busy_timeout: Duration) -> Self {
        if is_busy(&err) {
            Self::LockTimeout {
                seconds: busy_timeout.as_secs().max(1),
            }
        } else {
            Self::Database(err)
        }
    }

    /// Returns `true` if this error was caused by bad input.
    ///
    /// Seat range errors count as validation errors.
    ///
    /// # Examples
    ///
    /// ```
    /// use busbook::Error;
    ///
    /// let err = Error::InvalidSeat { value: 46, reason: "out of range".into() };
    /// assert!(err.is_validation());
    /// ```
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::InvalidSeat { .. })
    }

    /// Returns `true` if this error is a seat/date conflict.
    ///
    /// # Examples
    ///
    /// ```
    /// use busbook::Error;
    ///
    /// let err = Error::Conflict { details: "seat 12 on 2024-06-08".into() };
    /// assert!(err.is_conflict());
    /// ```
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Returns `true` if the requested record does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if the underlying storage reported a unique or
    /// primary key violation.
    #[must_use]
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            Self::Database(rusqlite::Error::SqliteFailure(err, _)) => {
                err.code == rusqlite::ErrorCode::ConstraintViolation
            }
            _ => false,
        }
    }
}

fn is_busy(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if matches!(
                e.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            )
    )
}
