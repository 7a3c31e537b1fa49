//! In-memory fakes for the aggregator and cache tests.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use fc_core::entities::{ChecklistRecord, LineItem, RepairStatusEntry};
use fc_core::enums::{CheckCategory, ItemOutcome};
use fc_core::responses::StatsSnapshot;
use fc_db::error::DatabaseError;
use fc_db::repos::ChecklistFilter;

use crate::cache::StatsSource;
use crate::clock::ManualClock;
use crate::error::StatsError;
use crate::store::RecordStore;

pub fn clock_at(now: DateTime<Utc>) -> Arc<ManualClock> {
    Arc::new(ManualClock::new(now))
}

pub fn record(id: &str, category: CheckCategory, completed_at: DateTime<Utc>) -> ChecklistRecord {
    ChecklistRecord {
        id: id.into(),
        company_id: None,
        staff_name: "Alan Day".into(),
        machine_make: "JCB".into(),
        machine_model: "535-95".into(),
        category,
        completed_at,
        items: Vec::new(),
        notes: None,
        status: "completed".into(),
    }
}

pub fn item(label: &str, outcome: ItemOutcome) -> LineItem {
    LineItem {
        label: label.into(),
        outcome,
        note: None,
    }
}

fn matches(filter: &ChecklistFilter, record: &ChecklistRecord) -> bool {
    filter
        .company_id
        .as_ref()
        .is_none_or(|c| record.company_id.as_ref() == Some(c))
        && filter
            .categories
            .as_ref()
            .is_none_or(|cats| cats.contains(&record.category))
        && filter.completed_from.is_none_or(|from| record.completed_at >= from)
        && filter.completed_before.is_none_or(|before| record.completed_at < before)
}

/// Record store over a vector and a map.
#[derive(Default)]
pub struct FakeStore {
    records: Mutex<Vec<ChecklistRecord>>,
    ledger: Mutex<HashMap<String, RepairStatusEntry>>,
    failing: AtomicBool,
}

impl FakeStore {
    pub fn insert(&self, record: ChecklistRecord) {
        self.records.lock().unwrap().push(record);
    }

    pub fn acknowledge(&self, repair_id: &str) {
        self.ledger
            .lock()
            .unwrap()
            .entry(repair_id.to_string())
            .or_insert_with(|| RepairStatusEntry::untouched(repair_id))
            .acknowledged = true;
    }

    pub fn complete(&self, repair_id: &str) {
        self.ledger
            .lock()
            .unwrap()
            .entry(repair_id.to_string())
            .or_insert_with(|| RepairStatusEntry::untouched(repair_id))
            .completed = true;
    }

    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), DatabaseError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DatabaseError::Unavailable("fake store is down".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for FakeStore {
    async fn count(&self, filter: &ChecklistFilter) -> Result<u64, DatabaseError> {
        self.check()?;
        let records = self.records.lock().unwrap();
        Ok(records.iter().filter(|r| matches(filter, r)).count() as u64)
    }

    async fn find(
        &self,
        filter: &ChecklistFilter,
        limit: u32,
    ) -> Result<Vec<ChecklistRecord>, DatabaseError> {
        self.check()?;
        let mut found: Vec<_> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| matches(filter, r))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        found.truncate(limit as usize);
        Ok(found)
    }

    async fn lookup(
        &self,
        repair_ids: &BTreeSet<String>,
    ) -> Result<HashMap<String, RepairStatusEntry>, DatabaseError> {
        self.check()?;
        let ledger = self.ledger.lock().unwrap();
        Ok(repair_ids
            .iter()
            .filter_map(|id| ledger.get(id).map(|e| (id.clone(), e.clone())))
            .collect())
    }
}

/// Snapshot source that counts its invocations and can be made to fail or
/// to pause until released.
#[derive(Default)]
pub struct CountingSource {
    calls: AtomicUsize,
    failing: AtomicBool,
    gate: Option<Arc<tokio::sync::Notify>>,
}

impl CountingSource {
    /// A source whose computes block until `gate` is notified.
    pub fn gated(gate: Arc<tokio::sync::Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl StatsSource for CountingSource {
    async fn compute(&self, tenant: Option<&str>) -> Result<StatsSnapshot, StatsError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) as u64 + 1;
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(DatabaseError::Unavailable("source down".into()).into());
        }
        Ok(StatsSnapshot {
            company_id: tenant.map(String::from),
            total_completed: call,
            today_total: 0,
            today_by_bucket: std::collections::BTreeMap::new(),
            new_repairs: 0,
            repairs_due: 0,
            repairs_completed: 0,
            repair_completions_logged: 0,
            machine_additions_pending: 0,
            computed_at: Utc::now(),
            expires_at: None,
        })
    }
}
