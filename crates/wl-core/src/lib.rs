//! # wl-core
//!
//! Core types shared across the workload balancing crates.
//!
//! This crate provides:
//! - Entity structs for the year-scoped data model (standard loads, groups,
//!   staff, units, load functions, tasks, assignments)
//! - Entity kind enum and ID prefix constants
//! - Cross-cutting error types
//! - History records and the append-only history ledger
//! - Load rounding helpers
//! - CLI response types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod history;
pub mod ids;
pub mod numeric;
pub mod responses;
