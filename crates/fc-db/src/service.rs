//! Service layer over the record store.
//!
//! `FleetService` wraps `FleetDb` (raw database access). All repo methods are
//! implemented as `impl FleetService` blocks under `repos/`.

use crate::FleetDb;
use crate::error::DatabaseError;

/// Record store used by the API and the stats engine.
///
/// Mutations are single statements or short transactions; there is no
/// cross-table transactional guarantee beyond that.
pub struct FleetService {
    db: FleetDb,
}

impl FleetService {
    /// Open a service over a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = FleetDb::open_local(db_path).await?;
        Ok(Self { db })
    }

    /// Create from an existing `FleetDb`.
    #[must_use]
    pub const fn from_db(db: FleetDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &FleetDb {
        &self.db
    }

    /// Cheap liveness probe used by the health endpoint.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Unavailable` if the store does not answer.
    pub async fn ping(&self) -> Result<(), DatabaseError> {
        let mut rows = self
            .db
            .conn()
            .query("SELECT 1", ())
            .await
            .map_err(|e| DatabaseError::Unavailable(e.to_string()))?;
        rows.next()
            .await
            .map_err(|e| DatabaseError::Unavailable(e.to_string()))?
            .ok_or(DatabaseError::NoResult)?;
        Ok(())
    }
}
