use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{CheckCategory, ItemOutcome};

/// A submitted checklist.
///
/// Immutable once created, apart from category backfills.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ChecklistRecord {
    pub id: String,
    pub company_id: Option<String>,
    pub staff_name: String,
    pub machine_make: String,
    pub machine_model: String,
    pub category: CheckCategory,
    pub completed_at: DateTime<Utc>,
    pub items: Vec<LineItem>,
    pub notes: Option<String>,
    pub status: String,
}

impl ChecklistRecord {
    /// Line items marked unsatisfactory, in submission order.
    pub fn unsatisfactory_items(&self) -> impl Iterator<Item = &LineItem> {
        self.items
            .iter()
            .filter(|item| item.outcome == ItemOutcome::Unsatisfactory)
    }
}

/// One line of a checklist. Has no identity of its own.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LineItem {
    #[serde(alias = "item")]
    pub label: String,
    #[serde(alias = "checked")]
    pub outcome: ItemOutcome,
    #[serde(default, alias = "notes")]
    pub note: Option<String>,
}

/// Request body for submitting a checklist.
///
/// Accepts the field names used by the original mobile client
/// (`check_type`, `checklist_items`).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewChecklist {
    #[serde(default)]
    pub company_id: Option<String>,
    pub staff_name: String,
    pub machine_make: String,
    pub machine_model: String,
    #[serde(alias = "check_type")]
    pub category: CheckCategory,
    #[serde(default, alias = "checklist_items")]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Defaults to the time of submission.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}
