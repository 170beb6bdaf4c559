//! Unified error type for the school ledger.
//!
//! Every fallible operation in the crate returns [`Result`]. Storage failures
//! carry the underlying [`DbErr`] for logging, but [`Error::user_message`]
//! never exposes that detail to the person at the keyboard.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// All errors produced by the ledger.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file missing or malformed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Store unreachable or a statement/transaction failed
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// A primary lookup found nothing
    #[error("{entity} '{key}' not found")]
    NotFound {
        /// Kind of record looked up (e.g. "Student")
        entity: &'static str,
        /// Key that was looked up
        key: String,
    },

    /// Input rejected before touching the store
    #[error("Invalid input: {message}")]
    Validation {
        /// Human-readable reason
        message: String,
    },

    /// Insert collided with a uniqueness constraint
    #[error("{entity} '{key}' already exists")]
    UniquenessConflict {
        /// Kind of record being inserted
        entity: &'static str,
        /// Conflicting key
        key: String,
    },

    /// Registration number allocation kept colliding
    #[error("Could not allocate a registration number for {academic_year} after {attempts} attempts")]
    AllocationExhausted {
        /// Academic year the allocation was scoped to
        academic_year: String,
        /// Attempts made before giving up
        attempts: u32,
    },

    /// The four-digit registration sequence for a year is used up
    #[error("Registration sequence exhausted for prefix '{prefix}'")]
    SequenceOverflow {
        /// Prefix whose sequence ran out
        prefix: String,
    },

    /// The acting user lacks the capability for an operation
    #[error("Not permitted: {action}")]
    Forbidden {
        /// Operation that was refused
        action: String,
    },

    /// Filesystem failure, e.g. creating the database directory
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// `DATABASE_URL` unreadable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Writing command output failed
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),
}

impl Error {
    /// Shorthand for a validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Message safe to show at the input boundary.
    ///
    /// Storage errors collapse to a generic failure; everything else keeps
    /// its reason.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Database(_) | Self::Io(_) | Self::Fmt(_) => {
                "The operation failed due to an internal error. No changes were saved.".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Returns true when a store error is a uniqueness-constraint violation.
#[must_use]
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
        || err.to_string().contains("UNIQUE constraint failed")
}

/// Returns true when the store refused a statement because another
/// connection holds a conflicting lock (`SQLITE_BUSY` / `SQLITE_LOCKED`).
#[must_use]
pub fn is_busy(err: &DbErr) -> bool {
    let message = err.to_string();
    message.contains("database is locked") || message.contains("database table is locked")
}

/// Errors a registration attempt may hit because another registration ran
/// at the same time; the attempt can be repeated from scratch.
#[must_use]
pub fn is_retryable_conflict(err: &DbErr) -> bool {
    is_unique_violation(err) || is_busy(err)
}

/// Maps an insert failure to `UniquenessConflict` when the store rejected a
/// duplicate key, or to a storage error otherwise.
pub fn conflict_or_storage(err: DbErr, entity: &'static str, key: impl Into<String>) -> Error {
    if is_unique_violation(&err) {
        Error::UniquenessConflict {
            entity,
            key: key.into(),
        }
    } else {
        Error::Database(err)
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
