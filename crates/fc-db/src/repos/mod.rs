//! Repository modules implementing operations for all fleetcheck entities.
//!
//! Each module adds methods to `FleetService` via `impl FleetService` blocks.

pub mod asset;
pub mod backfill;
pub mod checklist;
pub mod repair_status;
pub mod seed;
pub mod staff;

pub use checklist::ChecklistFilter;
pub use repair_status::LOOKUP_CHUNK;
pub use seed::{SeedFile, SeedReport};
