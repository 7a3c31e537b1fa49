//! One-off data repairs for rows written by older importers.

use fc_core::enums::CheckCategory;
use fc_core::responses::BackfillResponse;

use crate::error::DatabaseError;
use crate::helpers::{format_timestamp, is_canonical_timestamp, parse_datetime};
use crate::service::FleetService;

impl FleetService {
    /// Rewrite legacy category tags and non-canonical completion timestamps.
    ///
    /// Safe to run repeatedly; a second run rewrites nothing. Rows whose
    /// timestamp cannot be parsed at all are left alone and logged.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query or update fails.
    pub async fn normalize_categories(&self) -> Result<BackfillResponse, DatabaseError> {
        let conn = self.db().conn();

        let mut stale_tags = Vec::new();
        let mut rows = conn.query("SELECT DISTINCT category FROM checklists", ()).await?;
        while let Some(row) = rows.next().await? {
            let raw: String = row.get(0)?;
            let canonical = CheckCategory::parse(&raw).as_str().to_string();
            if canonical != raw {
                stale_tags.push((raw, canonical));
            }
        }

        let mut categories_rewritten = 0;
        for (raw, canonical) in stale_tags {
            let n = conn
                .execute(
                    "UPDATE checklists SET category = ?1 WHERE category = ?2",
                    [canonical.as_str(), raw.as_str()],
                )
                .await?;
            tracing::info!(from = %raw, to = %canonical, rows = n, "category rewritten");
            categories_rewritten += n;
        }

        // Canonical values are exactly 24 chars ending in 'Z'; everything else
        // is a candidate.
        let mut stale_times = Vec::new();
        let mut rows = conn
            .query(
                "SELECT id, completed_at FROM checklists
                 WHERE length(completed_at) != 24 OR substr(completed_at, 24, 1) != 'Z'",
                (),
            )
            .await?;
        while let Some(row) = rows.next().await? {
            let id: String = row.get(0)?;
            let raw: String = row.get(1)?;
            if is_canonical_timestamp(&raw) {
                continue;
            }
            match parse_datetime(&raw) {
                Ok(dt) => stale_times.push((id, format_timestamp(dt))),
                Err(_) => tracing::warn!(id = %id, value = %raw, "unparseable completed_at left as is"),
            }
        }

        let mut timestamps_rewritten = 0;
        for (id, canonical) in stale_times {
            timestamps_rewritten += conn
                .execute(
                    "UPDATE checklists SET completed_at = ?1 WHERE id = ?2",
                    [canonical.as_str(), id.as_str()],
                )
                .await?;
        }

        Ok(BackfillResponse {
            categories_rewritten,
            timestamps_rewritten,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::ChecklistFilter;
    use crate::test_support::helpers::test_service;
    use pretty_assertions::assert_eq;

    async fn insert_raw(svc: &FleetService, id: &str, category: &str, completed_at: &str) {
        svc.db()
            .conn()
            .execute(
                "INSERT INTO checklists (id, staff_name, machine_make, machine_model, category, completed_at)
                 VALUES (?1, 'Alan Day', 'JCB', '3CX', ?2, ?3)",
                [id, category, completed_at],
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn rewrites_legacy_rows_once() {
        let svc = test_service().await;
        insert_raw(&svc, "chk-1", "NEW MACHINE", "2026-01-03T09:00:00.000Z").await;
        insert_raw(&svc, "chk-2", " REPAIR ", "2026-01-03 09:00:00").await;
        insert_raw(&svc, "chk-3", "daily_check", "2026-01-03T10:00:00+01:00").await;
        insert_raw(&svc, "chk-4", "daily_check", "not a date").await;

        let first = svc.normalize_categories().await.unwrap();
        assert_eq!(
            first,
            BackfillResponse {
                categories_rewritten: 2,
                timestamps_rewritten: 2,
            }
        );

        let second = svc.normalize_categories().await.unwrap();
        assert_eq!(
            second,
            BackfillResponse {
                categories_rewritten: 0,
                timestamps_rewritten: 0,
            }
        );

        let rec = svc.get_checklist("chk-3").await.unwrap();
        assert_eq!(format_timestamp(rec.completed_at), "2026-01-03T09:00:00.000Z");

        let repairs = ChecklistFilter::default().categories([CheckCategory::RepairReport]);
        assert_eq!(svc.count_checklists(&repairs).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn legacy_machine_tag_counts_before_backfill() {
        let svc = test_service().await;
        insert_raw(&svc, "chk-1", "NEW MACHINE", "2026-01-03T09:00:00.000Z").await;
        let filter = ChecklistFilter::default().categories([CheckCategory::MachineAddition]);
        assert_eq!(svc.count_checklists(&filter).await.unwrap(), 1);
    }
}
