//! Checklist repository: submission, lookup, filtered counts and bounded finds.

use chrono::{DateTime, Utc};

use fc_core::entities::{ChecklistRecord, LineItem, NewChecklist};
use fc_core::enums::CheckCategory;
use fc_core::ids::PREFIX_CHECKLIST;

use crate::error::DatabaseError;
use crate::helpers::{format_timestamp, get_count, get_opt_string, parse_datetime, parse_json, placeholders};
use crate::service::FleetService;

const SELECT_COLS: &str = "id, company_id, staff_name, machine_make, machine_model, category, \
                           completed_at, items, notes, status";

fn row_to_checklist(row: &libsql::Row) -> Result<ChecklistRecord, DatabaseError> {
    Ok(ChecklistRecord {
        id: row.get(0)?,
        company_id: get_opt_string(row, 1)?,
        staff_name: row.get(2)?,
        machine_make: row.get(3)?,
        machine_model: row.get(4)?,
        category: CheckCategory::parse(&row.get::<String>(5)?),
        completed_at: parse_datetime(&row.get::<String>(6)?)?,
        items: parse_json::<Vec<LineItem>>(&row.get::<String>(7)?)?,
        notes: get_opt_string(row, 8)?,
        status: row.get(9)?,
    })
}

/// Every `{id}` such that `{id}-{label}` spells the repair identity with a
/// non-empty label.
fn record_id_candidates(repair_id: &str) -> Vec<String> {
    repair_id
        .match_indices('-')
        .map(|(i, _)| i)
        .filter(|&i| i > 0 && i + 1 < repair_id.len())
        .map(|i| repair_id[..i].to_string())
        .collect()
}

/// Filter criteria for checklist counts and finds.
///
/// The time range is half-open: `completed_from <= completed_at < completed_before`.
#[derive(Debug, Default, Clone)]
pub struct ChecklistFilter {
    pub company_id: Option<String>,
    /// `Some(vec![])` matches nothing.
    pub categories: Option<Vec<CheckCategory>>,
    pub completed_from: Option<DateTime<Utc>>,
    pub completed_before: Option<DateTime<Utc>>,
}

impl ChecklistFilter {
    /// Filter scoped to one tenant, or to every tenant when `None`.
    #[must_use]
    pub fn for_tenant(company_id: Option<&str>) -> Self {
        Self {
            company_id: company_id.map(String::from),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn categories(mut self, categories: impl IntoIterator<Item = CheckCategory>) -> Self {
        self.categories = Some(categories.into_iter().collect());
        self
    }

    #[must_use]
    pub const fn completed_from(mut self, from: DateTime<Utc>) -> Self {
        self.completed_from = Some(from);
        self
    }

    #[must_use]
    pub const fn completed_before(mut self, before: DateTime<Utc>) -> Self {
        self.completed_before = Some(before);
        self
    }

    /// Render as a `WHERE` clause (possibly empty) plus positional params.
    fn to_sql(&self) -> (String, Vec<libsql::Value>) {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref company_id) = self.company_id {
            params.push(libsql::Value::Text(company_id.clone()));
            conditions.push(format!("company_id = ?{}", params.len()));
        }
        if let Some(ref categories) = self.categories {
            if categories.is_empty() {
                conditions.push("0 = 1".to_string());
            } else {
                // Legacy aliases match too, so un-backfilled rows still count.
                let start = params.len() + 1;
                params.extend(categories.iter().flat_map(|c| {
                    std::iter::once(c.as_str())
                        .chain(c.legacy_tags().iter().copied())
                        .map(|tag| libsql::Value::Text(tag.to_string()))
                }));
                conditions.push(format!(
                    "category IN ({})",
                    placeholders(start, params.len() + 1 - start)
                ));
            }
        }
        if let Some(from) = self.completed_from {
            params.push(libsql::Value::Text(format_timestamp(from)));
            conditions.push(format!("completed_at >= ?{}", params.len()));
        }
        if let Some(before) = self.completed_before {
            params.push(libsql::Value::Text(format_timestamp(before)));
            conditions.push(format!("completed_at < ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        (where_clause, params)
    }
}

impl FleetService {
    /// Store a submitted checklist. `completed_at` defaults to now.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if ID generation or the INSERT fails.
    pub async fn create_checklist(&self, new: NewChecklist) -> Result<ChecklistRecord, DatabaseError> {
        let id = self.db().generate_id(PREFIX_CHECKLIST).await?;
        let completed_at = new.completed_at.unwrap_or_else(Utc::now);
        let items_json =
            serde_json::to_string(&new.items).map_err(|e| DatabaseError::Other(e.into()))?;

        self.db()
            .conn()
            .execute(
                &format!(
                    "INSERT INTO checklists ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
                ),
                libsql::params![
                    id.as_str(),
                    new.company_id.as_deref(),
                    new.staff_name.as_str(),
                    new.machine_make.as_str(),
                    new.machine_model.as_str(),
                    new.category.as_str(),
                    format_timestamp(completed_at),
                    items_json,
                    new.notes.as_deref(),
                    "completed"
                ],
            )
            .await?;

        tracing::debug!(id = %id, category = %new.category, "checklist stored");

        // Round-trip through the canonical timestamp so the returned record
        // matches what a later read yields.
        Ok(ChecklistRecord {
            id,
            company_id: new.company_id,
            staff_name: new.staff_name,
            machine_make: new.machine_make,
            machine_model: new.machine_model,
            category: new.category,
            completed_at: parse_datetime(&format_timestamp(completed_at))?,
            items: new.items,
            notes: new.notes,
            status: "completed".to_string(),
        })
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no checklist has this ID.
    pub async fn get_checklist(&self, id: &str) -> Result<ChecklistRecord, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM checklists WHERE id = ?1"), [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_checklist(&row)
    }

    /// Count checklists matching the filter.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn count_checklists(&self, filter: &ChecklistFilter) -> Result<u64, DatabaseError> {
        let (where_clause, params) = filter.to_sql();
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT COUNT(*) FROM checklists {where_clause}"),
                libsql::params_from_iter(params),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        get_count(&row, 0)
    }

    /// Newest-first page of checklists matching the filter.
    ///
    /// Always bounded by `limit`. Rows that cannot be decoded (for example a
    /// legacy `completed_at` no format accepts) are skipped with a warning,
    /// so a page may hold fewer than `limit` records.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_checklists(
        &self,
        filter: &ChecklistFilter,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<ChecklistRecord>, DatabaseError> {
        let (where_clause, mut params) = filter.to_sql();
        params.push(libsql::Value::Integer(i64::from(limit)));
        let limit_idx = params.len();
        params.push(libsql::Value::Integer(i64::from(offset)));
        let offset_idx = params.len();

        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM checklists {where_clause} \
                     ORDER BY completed_at DESC, id LIMIT ?{limit_idx} OFFSET ?{offset_idx}"
                ),
                libsql::params_from_iter(params),
            )
            .await?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            match row_to_checklist(&row) {
                Ok(record) => records.push(record),
                Err(e) => {
                    let id = row.get::<String>(0).unwrap_or_default();
                    tracing::warn!(id = %id, error = %e, "skipping unreadable checklist row");
                }
            }
        }
        Ok(records)
    }

    /// Records whose ID is a `{id}-` prefix of the repair identity.
    ///
    /// Usually one; more only if record IDs prefix one another. The caller
    /// decides which, if any, actually derives the repair. Candidates are cut
    /// at each `-` of the identity and matched on the primary key.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a row is malformed.
    pub async fn checklists_for_repair(
        &self,
        repair_id: &str,
    ) -> Result<Vec<ChecklistRecord>, DatabaseError> {
        let candidates = record_id_candidates(repair_id);
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM checklists WHERE id IN ({})",
                    placeholders(1, candidates.len())
                ),
                libsql::params_from_iter(candidates),
            )
            .await?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(row_to_checklist(&row)?);
        }
        Ok(records)
    }

    /// Bounded fetch used by the stats engine.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a row is malformed.
    pub async fn find_checklists(
        &self,
        filter: &ChecklistFilter,
        limit: u32,
    ) -> Result<Vec<ChecklistRecord>, DatabaseError> {
        self.list_checklists(filter, limit, 0).await
    }
}
