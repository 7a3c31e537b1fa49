//! Database error types for fc-db.

use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or returned malformed data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// The backing store could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A uniqueness constraint rejected the write.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    /// Whether a caller could reasonably retry the operation later.
    ///
    /// Nothing in this crate retries on its own; the flag is surfaced so the
    /// HTTP layer can answer 503 instead of 500.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unavailable(_) => true,
            Self::LibSql(e) => is_transient_libsql_error(e),
            _ => false,
        }
    }
}

/// Map a UNIQUE constraint failure to `Conflict`, pass everything else through.
pub(crate) fn map_unique_violation(e: libsql::Error, what: &str) -> DatabaseError {
    if e.to_string().contains("UNIQUE constraint failed") {
        DatabaseError::Conflict(what.to_string())
    } else {
        DatabaseError::LibSql(e)
    }
}

/// Detect libSQL errors caused by store availability rather than by the query.
///
/// The predicate is intentionally narrow to avoid treating genuine SQL or
/// constraint errors as transient.
pub fn is_transient_libsql_error(e: &libsql::Error) -> bool {
    let msg = e.to_string().to_ascii_lowercase();
    msg.contains("database is locked")
        || msg.contains("database table is locked")
        || msg.contains("unable to open database")
        || msg.contains("disk i/o error")
}
