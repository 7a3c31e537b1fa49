use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Ledger entry holding the acknowledgement/completion flags of one derived repair.
///
/// Keyed by the derived repair identity (`{record_id}-{label}` or
/// `{record_id}-general`). Created by the first action recorded against the
/// identity and never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RepairStatusEntry {
    pub repair_id: String,
    pub acknowledged: bool,
    pub completed: bool,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub progress_notes: Vec<ProgressNote>,
}

impl RepairStatusEntry {
    /// An entry for a repair nobody has acted on yet.
    #[must_use]
    pub fn untouched(repair_id: impl Into<String>) -> Self {
        Self {
            repair_id: repair_id.into(),
            acknowledged: false,
            completed: false,
            acknowledged_at: None,
            completed_at: None,
            progress_notes: Vec::new(),
        }
    }
}

/// Free-text progress note appended to a repair.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProgressNote {
    pub text: String,
    pub author: String,
    pub date: DateTime<Utc>,
}
