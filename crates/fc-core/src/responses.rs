//! Response types returned as JSON by the API and the `fleetcheck stats` command.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::ProgressNote;
use crate::enums::RepairState;

/// Aggregate dashboard counts produced by one aggregation pass.
///
/// Immutable once built; the cache shares it behind an `Arc`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub company_id: Option<String>,
    /// Completed standard inspections, all time.
    pub total_completed: u64,
    /// Checklists of any kind completed today (UTC).
    pub today_total: u64,
    /// Today's checklists grouped into display buckets.
    pub today_by_bucket: BTreeMap<String, u64>,
    pub new_repairs: u64,
    pub repairs_due: u64,
    pub repairs_completed: u64,
    /// `REPAIR COMPLETED` records, all time.
    pub repair_completions_logged: u64,
    pub machine_additions_pending: u64,
    pub computed_at: DateTime<Utc>,
    /// Set by the cache when the snapshot is stored.
    pub expires_at: Option<DateTime<Utc>>,
}

/// One derived repair with its record context and ledger state.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RepairView {
    pub repair_id: String,
    pub record_id: String,
    pub company_id: Option<String>,
    pub machine_make: String,
    pub machine_model: String,
    pub reported_by: String,
    pub reported_at: DateTime<Utc>,
    /// Line item label; `None` for a standalone repair report.
    pub item: Option<String>,
    pub note: Option<String>,
    pub state: RepairState,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub progress_notes: Vec<ProgressNote>,
}

/// Response from the repair-status actions.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RepairActionResponse {
    pub repair_id: String,
    pub state: RepairState,
}

/// Response from the category backfill.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BackfillResponse {
    pub categories_rewritten: u64,
    pub timestamps_rewritten: u64,
}
