//! Entity structs for all fleetcheck domain objects.
//!
//! Each entity maps to a table in the libSQL database (see `fc-db/migrations`).
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for JSON
//! roundtrip and schema validation.

mod asset;
mod checklist;
mod repair_status;
mod staff;

pub use asset::{Asset, NewAsset};
pub use checklist::{ChecklistRecord, LineItem, NewChecklist};
pub use repair_status::{ProgressNote, RepairStatusEntry};
pub use staff::{NewStaff, Staff};
