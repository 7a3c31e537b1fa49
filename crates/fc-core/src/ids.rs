//! ID prefixes for generated entity identifiers.
//!
//! IDs are `{prefix}-{8 hex chars}`, generated by the database layer.

pub const PREFIX_CHECKLIST: &str = "chk";
pub const PREFIX_STAFF: &str = "stf";
pub const PREFIX_ASSET: &str = "ast";

/// Every prefix in use, for tests that exercise ID generation.
pub const ALL_PREFIXES: &[&str] = &[PREFIX_CHECKLIST, PREFIX_STAFF, PREFIX_ASSET];
