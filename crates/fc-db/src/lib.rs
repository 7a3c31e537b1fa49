//! # fc-db
//!
//! libSQL record store for fleetcheck.
//!
//! Holds staff, assets, checklist records, and the repair ledger
//! (`repair_status` + `repair_progress_notes`). Checklist line items are kept
//! as a JSON document column; everything the dashboard filters on (tenant,
//! category, completion time) is a real indexed column.
//!
//! Uses the `libsql` crate (C `SQLite` fork) in local embedded mode.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle for all fleetcheck state.
///
/// Wraps a libSQL database and connection. Provides ID generation; the repo
/// methods live on [`service::FleetService`].
pub struct FleetDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl FleetDb {
    /// Open a local database at the given path (`":memory:"` for tests).
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Unavailable` if the database cannot be opened,
    /// or `DatabaseError::Migration` if migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Unavailable(format!("open {path}: {e}")))?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let fleet_db = Self { db, conn };
        fleet_db.run_migrations().await?;
        tracing::debug!(path, "opened fleetcheck database");
        Ok(fleet_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"chk-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query("SELECT ?1 || '-' || lower(hex(randomblob(4)))", [prefix])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}
