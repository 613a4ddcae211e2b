//! Partial-update types for user-managed entities.
//!
//! Each update holds `Option` fields; `None` leaves the column untouched and
//! `Some(None)` clears a nullable column.

pub mod assignment;
pub mod load_function;
pub mod staff;
pub mod task;
