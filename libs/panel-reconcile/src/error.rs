//! Reconciliation error types

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Result type for reconciliation operations
pub type Result<T> = std::result::Result<T, ReconcileError>;

/// Entity looked up by id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Egg,
    Server,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Egg => f.write_str("Egg"),
            EntityKind::Server => f.write_str("Server"),
        }
    }
}

/// Reconciliation errors
///
/// Nothing is retried. Every variant stops the current run; only
/// [`ReconcileError::NotFound`] leaves the process free to carry on.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Egg or server id absent from the panel database
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    /// Stuck transfer pointing at a server row that no longer exists
    #[error("Transfer {transfer_id} references missing server {server_id}")]
    OrphanedTransfer { transfer_id: i64, server_id: i64 },

    /// Query failed
    #[error("Read failed ({operation}): {message}")]
    Read {
        operation: &'static str,
        message: String,
    },

    /// Update or delete failed
    #[error("Write failed ({operation}): {message}")]
    Write {
        operation: &'static str,
        message: String,
    },

    /// Connect or ping failed
    #[error("Connection error: {0}")]
    Connection(String),

    /// Confirmation channel could not deliver an answer
    #[error("Prompt error: {0}")]
    Prompt(String),
}

impl ReconcileError {
    /// Create a not found error
    pub fn not_found(kind: EntityKind, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Wrap a failed query
    pub fn read(operation: &'static str, err: impl fmt::Display) -> Self {
        Self::Read {
            operation,
            message: err.to_string(),
        }
    }

    /// Wrap a failed update or delete
    pub fn write(operation: &'static str, err: impl fmt::Display) -> Self {
        Self::Write {
            operation,
            message: err.to_string(),
        }
    }

    /// Whether the operator session should end on this error.
    ///
    /// A missing egg or server only ends the current run; everything else
    /// needs out-of-band attention.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ReconcileError::NotFound { .. })
    }
}

impl From<std::io::Error> for ReconcileError {
    fn from(err: std::io::Error) -> Self {
        ReconcileError::Prompt(err.to_string())
    }
}
