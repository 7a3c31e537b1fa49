//! Category, outcome, and repair-state enums for fleetcheck.
//!
//! `CheckCategory` is stored as its display tag (the strings operators typed
//! into the original spreadsheets), so it serializes through `as_str()` rather
//! than `rename_all`. The other enums use `snake_case`.

use std::borrow::Cow;
use std::fmt;

use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// CheckCategory
// ---------------------------------------------------------------------------

/// Kind of checklist record.
///
/// The three standard inspection kinds count towards "total completed" and
/// produce one derived repair per unsatisfactory line item. `RepairReport`
/// produces exactly one derived repair. Everything else is bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CheckCategory {
    DailyCheck,
    GraderStartup,
    WorkshopService,
    /// Standalone repair report (`REPAIR`).
    RepairReport,
    /// Marker written when a repair is signed off (`REPAIR COMPLETED`).
    RepairCompleted,
    /// Request to add a machine to the fleet (`MACHINE ADD`, legacy `NEW MACHINE`).
    MachineAddition,
    /// Any other tag, kept verbatim.
    Other(String),
}

impl CheckCategory {
    /// Categories counted as completed inspections.
    pub const STANDARD: [Self; 3] = [Self::DailyCheck, Self::GraderStartup, Self::WorkshopService];

    /// Categories whose records can give rise to derived repairs.
    pub const REPAIR_SOURCES: [Self; 4] = [
        Self::DailyCheck,
        Self::GraderStartup,
        Self::WorkshopService,
        Self::RepairReport,
    ];

    /// Parse a stored tag. Unknown tags become `Other`; never fails.
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        match tag.trim() {
            "daily_check" => Self::DailyCheck,
            "grader_startup" => Self::GraderStartup,
            "workshop_service" => Self::WorkshopService,
            "REPAIR" => Self::RepairReport,
            "REPAIR COMPLETED" => Self::RepairCompleted,
            "MACHINE ADD" | "NEW MACHINE" => Self::MachineAddition,
            other => Self::Other(other.to_string()),
        }
    }

    /// Canonical storage tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::DailyCheck => "daily_check",
            Self::GraderStartup => "grader_startup",
            Self::WorkshopService => "workshop_service",
            Self::RepairReport => "REPAIR",
            Self::RepairCompleted => "REPAIR COMPLETED",
            Self::MachineAddition => "MACHINE ADD",
            Self::Other(tag) => tag,
        }
    }

    /// Tags older imports stored for this category, besides [`Self::as_str`].
    #[must_use]
    pub const fn legacy_tags(&self) -> &'static [&'static str] {
        match self {
            Self::MachineAddition => &["NEW MACHINE"],
            _ => &[],
        }
    }

    /// Human-facing label, used as the fallback dashboard bucket.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::DailyCheck => "Daily check",
            Self::GraderStartup => "Grader start-up",
            Self::WorkshopService => "Workshop service",
            Self::RepairReport => "Repair",
            Self::RepairCompleted => "Repair completed",
            Self::MachineAddition => "Machine addition",
            Self::Other(tag) => tag,
        }
    }

    #[must_use]
    pub fn is_standard(&self) -> bool {
        matches!(
            self,
            Self::DailyCheck | Self::GraderStartup | Self::WorkshopService
        )
    }
}

impl fmt::Display for CheckCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CheckCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CheckCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::parse(&tag))
    }
}

impl JsonSchema for CheckCategory {
    fn schema_name() -> Cow<'static, str> {
        "CheckCategory".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({ "type": "string" })
    }
}

// ---------------------------------------------------------------------------
// ItemOutcome
// ---------------------------------------------------------------------------

/// Outcome of a single checklist line item.
///
/// Older clients send a boolean `checked` flag instead; `true` reads as
/// satisfactory and `false` as unsatisfactory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ItemOutcome {
    Satisfactory,
    Unsatisfactory,
    NotApplicable,
}

impl ItemOutcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Satisfactory => "satisfactory",
            Self::Unsatisfactory => "unsatisfactory",
            Self::NotApplicable => "not_applicable",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "satisfactory" | "ok" | "pass" => Some(Self::Satisfactory),
            "unsatisfactory" | "fail" | "defect" => Some(Self::Unsatisfactory),
            "not_applicable" | "n/a" | "na" => Some(Self::NotApplicable),
            _ => None,
        }
    }
}

impl fmt::Display for ItemOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ItemOutcome {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Checked(bool),
            Tag(String),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Checked(true) => Ok(Self::Satisfactory),
            Wire::Checked(false) => Ok(Self::Unsatisfactory),
            Wire::Tag(tag) => Self::parse(&tag)
                .ok_or_else(|| D::Error::custom(format!("unknown item outcome '{tag}'"))),
        }
    }
}

// ---------------------------------------------------------------------------
// RepairState
// ---------------------------------------------------------------------------

/// Lifecycle state of a derived repair.
///
/// ```text
/// new → due (acknowledged) → completed
/// new → completed
/// ```
///
/// The state is never stored; it is read off the ledger entry each time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RepairState {
    New,
    Due,
    Completed,
}

impl RepairState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Due => "due",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for RepairState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
