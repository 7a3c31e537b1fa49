//! Repair ledger: acknowledgement/completion flags and progress notes keyed by
//! derived repair identity.
//!
//! Every write is an independent upsert, so the three actions can arrive in
//! any order and repeat safely. Timestamps record the first time a flag was
//! set; later repeats keep them.

use std::collections::{BTreeSet, HashMap};

use chrono::Utc;

use fc_core::entities::{ProgressNote, RepairStatusEntry};

use crate::error::DatabaseError;
use crate::helpers::{format_timestamp, get_flag, parse_datetime, parse_optional_datetime, placeholders};
use crate::service::FleetService;

/// Maximum identities bound into one `IN (...)` lookup.
pub const LOOKUP_CHUNK: usize = 500;

fn row_to_entry(row: &libsql::Row) -> Result<RepairStatusEntry, DatabaseError> {
    Ok(RepairStatusEntry {
        repair_id: row.get(0)?,
        acknowledged: get_flag(row, 1)?,
        completed: get_flag(row, 2)?,
        acknowledged_at: parse_optional_datetime(row.get::<Option<String>>(3)?.as_deref())?,
        completed_at: parse_optional_datetime(row.get::<Option<String>>(4)?.as_deref())?,
        progress_notes: Vec::new(),
    })
}

impl FleetService {
    /// Mark a repair as acknowledged (due).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the upsert fails.
    pub async fn acknowledge_repair(&self, repair_id: &str) -> Result<RepairStatusEntry, DatabaseError> {
        let now = format_timestamp(Utc::now());
        self.db()
            .conn()
            .execute(
                "INSERT INTO repair_status (repair_id, acknowledged, acknowledged_at)
                 VALUES (?1, 1, ?2)
                 ON CONFLICT(repair_id) DO UPDATE SET
                    acknowledged = 1,
                    acknowledged_at = COALESCE(repair_status.acknowledged_at, excluded.acknowledged_at)",
                libsql::params![repair_id, now],
            )
            .await?;
        tracing::info!(repair_id, "repair acknowledged");
        self.require_repair_status(repair_id).await
    }

    /// Mark a repair as completed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the upsert fails.
    pub async fn complete_repair(&self, repair_id: &str) -> Result<RepairStatusEntry, DatabaseError> {
        let now = format_timestamp(Utc::now());
        self.db()
            .conn()
            .execute(
                "INSERT INTO repair_status (repair_id, completed, completed_at)
                 VALUES (?1, 1, ?2)
                 ON CONFLICT(repair_id) DO UPDATE SET
                    completed = 1,
                    completed_at = COALESCE(repair_status.completed_at, excluded.completed_at)",
                libsql::params![repair_id, now],
            )
            .await?;
        tracing::info!(repair_id, "repair completed");
        self.require_repair_status(repair_id).await
    }

    /// Append a progress note, creating the ledger entry if needed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if either write fails; neither is kept then.
    pub async fn add_repair_note(
        &self,
        repair_id: &str,
        text: &str,
        author: &str,
    ) -> Result<RepairStatusEntry, DatabaseError> {
        let now = format_timestamp(Utc::now());
        let tx = self.db().conn().transaction().await?;
        tx.execute(
            "INSERT INTO repair_status (repair_id) VALUES (?1) ON CONFLICT(repair_id) DO NOTHING",
            [repair_id],
        )
        .await?;
        tx.execute(
            "INSERT INTO repair_progress_notes (repair_id, text, author, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            libsql::params![repair_id, text, author, now],
        )
        .await?;
        tx.commit().await?;

        tracing::debug!(repair_id, "progress note added");
        self.require_repair_status(repair_id).await
    }

    /// Ledger entry for one repair with its notes, or `None` if never acted on.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn get_repair_status(
        &self,
        repair_id: &str,
    ) -> Result<Option<RepairStatusEntry>, DatabaseError> {
        let ids = BTreeSet::from([repair_id.to_string()]);
        let mut found = self.lookup_repair_status(&ids).await?;
        Ok(found.remove(repair_id))
    }

    async fn require_repair_status(&self, repair_id: &str) -> Result<RepairStatusEntry, DatabaseError> {
        self.get_repair_status(repair_id)
            .await?
            .ok_or(DatabaseError::NoResult)
    }

    /// Batched ledger lookup. Identities with no entry are absent from the map.
    ///
    /// Issues one flags query and one notes query per chunk of
    /// [`LOOKUP_CHUNK`] identities.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any query fails. A failure is never
    /// reported as "no status".
    pub async fn lookup_repair_status(
        &self,
        repair_ids: &BTreeSet<String>,
    ) -> Result<HashMap<String, RepairStatusEntry>, DatabaseError> {
        let ids: Vec<&String> = repair_ids.iter().collect();
        let mut entries = HashMap::with_capacity(ids.len());

        for chunk in ids.chunks(LOOKUP_CHUNK) {
            let in_list = placeholders(1, chunk.len());
            let params: Vec<libsql::Value> = chunk
                .iter()
                .map(|id| libsql::Value::Text((*id).clone()))
                .collect();

            let mut rows = self
                .db()
                .conn()
                .query(
                    &format!(
                        "SELECT repair_id, acknowledged, completed, acknowledged_at, completed_at
                         FROM repair_status WHERE repair_id IN ({in_list})"
                    ),
                    libsql::params_from_iter(params.clone()),
                )
                .await?;
            while let Some(row) = rows.next().await? {
                let entry = row_to_entry(&row)?;
                entries.insert(entry.repair_id.clone(), entry);
            }

            let mut rows = self
                .db()
                .conn()
                .query(
                    &format!(
                        "SELECT repair_id, text, author, created_at
                         FROM repair_progress_notes WHERE repair_id IN ({in_list})
                         ORDER BY repair_id, id"
                    ),
                    libsql::params_from_iter(params),
                )
                .await?;
            while let Some(row) = rows.next().await? {
                let repair_id: String = row.get(0)?;
                let note = ProgressNote {
                    text: row.get(1)?,
                    author: row.get(2)?,
                    date: parse_datetime(&row.get::<String>(3)?)?,
                };
                entries
                    .entry(repair_id.clone())
                    .or_insert_with(|| RepairStatusEntry::untouched(repair_id))
                    .progress_notes
                    .push(note);
            }
        }

        tracing::debug!(requested = repair_ids.len(), found = entries.len(), "ledger lookup");
        Ok(entries)
    }
}
