//! # fc-core
//!
//! Core types and ID prefixes for fleetcheck.
//!
//! This crate provides the foundational types shared across all fleetcheck crates:
//! - Entity structs for checklist records, staff, assets, and the repair ledger
//! - Category and outcome enums with their storage representations
//! - Repair identity derivation and three-way repair classification
//! - ID prefix constants
//! - API response types (stats snapshot, repair board)

pub mod entities;
pub mod enums;
pub mod ids;
pub mod repair;
pub mod responses;
