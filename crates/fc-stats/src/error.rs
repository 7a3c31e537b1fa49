//! Error types for fc-stats.

use fc_db::error::DatabaseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    /// The record store failed; nothing was cached.
    #[error("record store error: {0}")]
    Store(#[from] DatabaseError),
}

impl StatsError {
    /// Whether the failure came from store availability rather than bad data.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Store(e) => e.is_transient(),
        }
    }
}
