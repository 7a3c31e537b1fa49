//! Dashboard aggregation and repair reconciliation.
//!
//! One pass runs the independent count queries concurrently, derives repair
//! identities from recent checklist records, looks them up in the ledger in a
//! single batch, and classifies each one.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use fc_config::{BucketRule, StatsConfig};
use fc_core::entities::{ChecklistRecord, RepairStatusEntry};
use fc_core::enums::{CheckCategory, RepairState};
use fc_core::repair::{classify, derive_repairs};
use fc_core::responses::{RepairView, StatsSnapshot};
use fc_db::repos::ChecklistFilter;

use crate::cache::StatsSource;
use crate::clock::Clock;
use crate::error::StatsError;
use crate::store::RecordStore;

/// Computes [`StatsSnapshot`]s and the repair board from a [`RecordStore`].
pub struct StatsAggregator {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
    config: StatsConfig,
}

/// Classified repair counts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct RepairCounts {
    new: u64,
    due: u64,
    completed: u64,
}

impl StatsAggregator {
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>, config: StatsConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// Run one aggregation pass for a tenant, or across all tenants.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::Store` if any query fails. No partial snapshot is
    /// ever produced.
    pub async fn compute(&self, tenant: Option<&str>) -> Result<StatsSnapshot, StatsError> {
        let now = self.clock.now();
        let (day_start, day_end) = utc_day_bounds(now);
        let base = ChecklistFilter::for_tenant(tenant);

        let total_filter = base.clone().categories(CheckCategory::STANDARD);
        let today_filter = base.clone().completed_from(day_start).completed_before(day_end);
        let completions_filter = base.clone().categories([CheckCategory::RepairCompleted]);
        let additions_filter = base
            .clone()
            .categories([CheckCategory::MachineAddition])
            .completed_from(days_before(now, self.config.machine_addition_window_days));
        let repair_filter = self.repair_window_filter(base, now);

        let (
            total_completed,
            today_total,
            today_records,
            repair_completions_logged,
            machine_additions_pending,
            repair_records,
        ) = tokio::try_join!(
            self.store.count(&total_filter),
            self.store.count(&today_filter),
            self.store.find(&today_filter, self.config.today_scan_limit),
            self.store.count(&completions_filter),
            self.store.count(&additions_filter),
            self.store.find(&repair_filter, self.config.repair_scan_limit),
        )?;

        if usize::try_from(today_total).is_ok_and(|n| n > today_records.len()) {
            tracing::warn!(
                today_total,
                fetched = today_records.len(),
                "today's bucket breakdown truncated by scan limit"
            );
        }
        if usize::try_from(self.config.repair_scan_limit).is_ok_and(|limit| repair_records.len() >= limit) {
            tracing::warn!(
                limit = self.config.repair_scan_limit,
                "repair window hit the scan limit; older repairs are not counted"
            );
        }

        let today_by_bucket = bucket_counts(&today_records, &self.config.buckets);

        let repair_ids: BTreeSet<String> = repair_records
            .iter()
            .flat_map(derive_repairs)
            .map(|r| r.id)
            .collect();
        let ledger = self.store.lookup(&repair_ids).await?;
        let counts = classify_all(&repair_ids, |id| ledger.get(id), tenant);

        tracing::info!(
            tenant = tenant.unwrap_or("*"),
            total_completed,
            today_total,
            derived = repair_ids.len(),
            "stats computed"
        );

        Ok(StatsSnapshot {
            company_id: tenant.map(String::from),
            total_completed,
            today_total,
            today_by_bucket,
            new_repairs: counts.new,
            repairs_due: counts.due,
            repairs_completed: counts.completed,
            repair_completions_logged,
            machine_additions_pending,
            computed_at: now,
            expires_at: None,
        })
    }

    /// Every derived repair in the window with its record context and state,
    /// newest record first.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::Store` if a query fails.
    pub async fn repairs(&self, tenant: Option<&str>) -> Result<Vec<RepairView>, StatsError> {
        let now = self.clock.now();
        let filter = self.repair_window_filter(ChecklistFilter::for_tenant(tenant), now);
        let records = self
            .store
            .find(&filter, self.config.repair_scan_limit)
            .await?;

        let derived: Vec<_> = records
            .iter()
            .flat_map(|record| derive_repairs(record).into_iter().map(move |r| (record, r)))
            .collect();
        let ids: BTreeSet<String> = derived.iter().map(|(_, r)| r.id.clone()).collect();
        let mut ledger = self.store.lookup(&ids).await?;

        Ok(derived
            .into_iter()
            .map(|(record, repair)| {
                let entry = ledger.remove(&repair.id);
                let state = classify(entry.as_ref());
                let entry = entry.unwrap_or_else(|| RepairStatusEntry::untouched(&repair.id));
                RepairView {
                    repair_id: repair.id,
                    record_id: repair.record_id,
                    company_id: record.company_id.clone(),
                    machine_make: record.machine_make.clone(),
                    machine_model: record.machine_model.clone(),
                    reported_by: record.staff_name.clone(),
                    reported_at: record.completed_at,
                    item: repair.label,
                    note: repair.note,
                    state,
                    acknowledged_at: entry.acknowledged_at,
                    completed_at: entry.completed_at,
                    progress_notes: entry.progress_notes,
                }
            })
            .collect())
    }

    fn repair_window_filter(&self, base: ChecklistFilter, now: DateTime<Utc>) -> ChecklistFilter {
        base.categories(CheckCategory::REPAIR_SOURCES)
            .completed_from(days_before(now, self.config.repair_window_days))
    }
}

#[async_trait]
impl StatsSource for StatsAggregator {
    async fn compute(&self, tenant: Option<&str>) -> Result<StatsSnapshot, StatsError> {
        Self::compute(self, tenant).await
    }
}

/// Start of a rolling window; saturates at the earliest representable instant.
fn days_before(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    now.checked_sub_signed(Duration::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// `[midnight, next midnight)` in UTC for the day containing `now`.
fn utc_day_bounds(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map_or(now, |naive| naive.and_utc());
    (start, start + Duration::days(1))
}

/// First matching rule wins; unmatched records fall back to the category label.
fn bucket_for<'a>(record: &'a ChecklistRecord, rules: &'a [BucketRule]) -> &'a str {
    let make = record.machine_make.to_lowercase();
    rules
        .iter()
        .find(|rule| make.contains(&rule.make_contains.to_lowercase()))
        .map_or_else(|| record.category.label(), |rule| rule.bucket.as_str())
}

fn bucket_counts(records: &[ChecklistRecord], rules: &[BucketRule]) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(bucket_for(record, rules).to_string()).or_insert(0) += 1;
    }
    counts
}

fn classify_all<'a>(
    ids: &BTreeSet<String>,
    entry_for: impl Fn(&str) -> Option<&'a RepairStatusEntry>,
    tenant: Option<&str>,
) -> RepairCounts {
    let mut due = 0_u64;
    let mut completed = 0_u64;
    for id in ids {
        match classify(entry_for(id)) {
            RepairState::Completed => completed += 1,
            RepairState::Due => due += 1,
            RepairState::New => {}
        }
    }

    let derived = i64::try_from(ids.len()).unwrap_or(i64::MAX);
    let due_i = i64::try_from(due).unwrap_or(i64::MAX);
    let completed_i = i64::try_from(completed).unwrap_or(i64::MAX);
    let new = derived - due_i - completed_i;
    if new < 0 {
        tracing::warn!(
            tenant = tenant.unwrap_or("*"),
            derived,
            due,
            completed,
            "classified repairs exceed derived repairs; clamping new to zero"
        );
    }

    RepairCounts {
        new: u64::try_from(new).unwrap_or(0),
        due,
        completed,
    }
}
