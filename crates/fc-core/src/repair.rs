//! Repair identity derivation and classification.
//!
//! Repairs are not stored as entities. They are read off checklist records:
//! every unsatisfactory line item of a standard inspection is a repair, and
//! every standalone repair report is one repair. The ledger keys its status
//! rows by the identity computed here, so the derivation must give the same
//! answer on every pass over unchanged data. It is keyed by item label, never
//! by position, and its output is sorted.

use std::collections::{BTreeMap, BTreeSet};

use crate::entities::{ChecklistRecord, RepairStatusEntry};
use crate::enums::{CheckCategory, RepairState};

/// Disambiguator used for standalone repair reports.
pub const GENERAL: &str = "general";

/// A repair synthesized from a checklist record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedRepair {
    pub id: String,
    pub record_id: String,
    /// Line item label, `None` for a standalone repair report.
    pub label: Option<String>,
    pub note: Option<String>,
}

/// Build a repair identity from its parent record and disambiguator.
#[must_use]
pub fn repair_id(record_id: &str, disambiguator: &str) -> String {
    format!("{record_id}-{disambiguator}")
}

/// Derive the repairs carried by a record, sorted by identity.
///
/// Unsatisfactory items sharing a label are the same fault and collapse into
/// one repair; the first non-empty note wins. Items with a blank label are
/// skipped because they cannot be keyed stably.
#[must_use]
pub fn derive_repairs(record: &ChecklistRecord) -> Vec<DerivedRepair> {
    match record.category {
        CheckCategory::RepairReport => vec![DerivedRepair {
            id: repair_id(&record.id, GENERAL),
            record_id: record.id.clone(),
            label: None,
            note: record.notes.clone(),
        }],
        ref category if category.is_standard() => {
            let mut by_id: BTreeMap<String, DerivedRepair> = BTreeMap::new();
            for item in record.unsatisfactory_items() {
                let label = item.label.trim();
                if label.is_empty() {
                    continue;
                }
                let id = repair_id(&record.id, label);
                let note = item.note.clone().filter(|n| !n.trim().is_empty());
                by_id
                    .entry(id.clone())
                    .and_modify(|existing| {
                        if existing.note.is_none() {
                            existing.note.clone_from(&note);
                        }
                    })
                    .or_insert_with(|| DerivedRepair {
                        id,
                        record_id: record.id.clone(),
                        label: Some(label.to_string()),
                        note,
                    });
            }
            by_id.into_values().collect()
        }
        _ => Vec::new(),
    }
}

/// Identities of the repairs carried by a record.
#[must_use]
pub fn derive_repair_ids(record: &ChecklistRecord) -> BTreeSet<String> {
    derive_repairs(record).into_iter().map(|r| r.id).collect()
}

/// Classify a repair from its ledger entry.
///
/// Precedence: completed beats acknowledged, acknowledged beats new. A missing
/// entry means nobody has acted on the repair.
#[must_use]
pub fn classify(entry: Option<&RepairStatusEntry>) -> RepairState {
    match entry {
        Some(e) if e.completed => RepairState::Completed,
        Some(e) if e.acknowledged => RepairState::Due,
        _ => RepairState::New,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::LineItem;
    use crate::enums::ItemOutcome;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn item(label: &str, outcome: ItemOutcome) -> LineItem {
        LineItem {
            label: label.into(),
            outcome,
            note: None,
        }
    }

    fn record(id: &str, category: CheckCategory, items: Vec<LineItem>) -> ChecklistRecord {
        ChecklistRecord {
            id: id.into(),
            company_id: None,
            staff_name: "Alan Day".into(),
            machine_make: "JCB".into(),
            machine_model: "541-70 Loadall".into(),
            category,
            completed_at: Utc::now(),
            items,
            notes: None,
            status: "completed".into(),
        }
    }

    #[test]
    fn one_repair_per_unsatisfactory_item() {
        let rec = record(
            "chk-1",
            CheckCategory::DailyCheck,
            vec![
                item("Tyres", ItemOutcome::Unsatisfactory),
                item("Lights", ItemOutcome::Satisfactory),
                item("Horn", ItemOutcome::Unsatisfactory),
                item("Beacon", ItemOutcome::NotApplicable),
            ],
        );
        let ids: Vec<_> = derive_repair_ids(&rec).into_iter().collect();
        assert_eq!(ids, vec!["chk-1-Horn".to_string(), "chk-1-Tyres".to_string()]);
    }

    #[test]
    fn derivation_is_deterministic() {
        let rec = record(
            "chk-2",
            CheckCategory::WorkshopService,
            vec![
                item("Hydraulic hoses", ItemOutcome::Unsatisfactory),
                item("Brakes", ItemOutcome::Unsatisfactory),
            ],
        );
        assert_eq!(derive_repair_ids(&rec), derive_repair_ids(&rec));
        assert_eq!(derive_repairs(&rec), derive_repairs(&rec));
    }

    #[test]
    fn derivation_ignores_item_order() {
        let forward = record(
            "chk-3",
            CheckCategory::GraderStartup,
            vec![
                item("Belts", ItemOutcome::Unsatisfactory),
                item("Rollers", ItemOutcome::Unsatisfactory),
            ],
        );
        let mut reversed = forward.clone();
        reversed.items.reverse();
        assert_eq!(derive_repair_ids(&forward), derive_repair_ids(&reversed));
    }

    #[test]
    fn repeated_labels_collapse_and_keep_first_note() {
        let mut first = item("Tyres", ItemOutcome::Unsatisfactory);
        first.note = Some("  ".into());
        let mut second = item(" Tyres ", ItemOutcome::Unsatisfactory);
        second.note = Some("front left flat".into());
        let rec = record("chk-4", CheckCategory::DailyCheck, vec![first, second]);

        let repairs = derive_repairs(&rec);
        assert_eq!(repairs.len(), 1);
        assert_eq!(repairs[0].id, "chk-4-Tyres");
        assert_eq!(repairs[0].note.as_deref(), Some("front left flat"));
    }

    #[test]
    fn blank_labels_are_skipped() {
        let rec = record(
            "chk-5",
            CheckCategory::DailyCheck,
            vec![item("   ", ItemOutcome::Unsatisfactory)],
        );
        assert!(derive_repairs(&rec).is_empty());
    }

    #[test]
    fn repair_report_yields_single_general_repair() {
        let mut rec = record("chk-6", CheckCategory::RepairReport, Vec::new());
        rec.notes = Some("Hydraulic leak under cab".into());
        let repairs = derive_repairs(&rec);
        assert_eq!(repairs.len(), 1);
        assert_eq!(repairs[0].id, "chk-6-general");
        assert_eq!(repairs[0].label, None);
        assert_eq!(repairs[0].note.as_deref(), Some("Hydraulic leak under cab"));
    }

    #[test]
    fn repair_report_ignores_its_line_items() {
        let rec = record(
            "chk-7",
            CheckCategory::RepairReport,
            vec![item("Tyres", ItemOutcome::Unsatisfactory)],
        );
        let ids: Vec<_> = derive_repair_ids(&rec).into_iter().collect();
        assert_eq!(ids, vec!["chk-7-general".to_string()]);
    }

    #[rstest]
    #[case(CheckCategory::RepairCompleted)]
    #[case(CheckCategory::MachineAddition)]
    #[case(CheckCategory::Other("Irrigator".into()))]
    fn other_categories_yield_nothing(#[case] category: CheckCategory) {
        let rec = record(
            "chk-8",
            category,
            vec![item("Tyres", ItemOutcome::Unsatisfactory)],
        );
        assert!(derive_repairs(&rec).is_empty());
    }

    fn entry(acknowledged: bool, completed: bool) -> RepairStatusEntry {
        RepairStatusEntry {
            acknowledged,
            completed,
            ..RepairStatusEntry::untouched("chk-1-Tyres")
        }
    }

    #[rstest]
    #[case(None, RepairState::New)]
    #[case(Some((false, false)), RepairState::New)]
    #[case(Some((true, false)), RepairState::Due)]
    #[case(Some((false, true)), RepairState::Completed)]
    #[case(Some((true, true)), RepairState::Completed)]
    fn classification_precedence(
        #[case] flags: Option<(bool, bool)>,
        #[case] expected: RepairState,
    ) {
        let entry = flags.map(|(ack, done)| entry(ack, done));
        assert_eq!(classify(entry.as_ref()), expected);
    }
}
