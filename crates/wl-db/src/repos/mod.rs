//! Repository methods, one module per entity.
//!
//! Each module provides `impl WorkloadService` methods for the user-facing
//! create/get/list/update surface, plus crate-private `fetch_*` and `write_*`
//! functions taking a bare connection so that the engine operations can run
//! them inside a transaction.

pub mod assignment;
pub mod group;
pub mod history;
pub mod load_function;
pub mod staff;
pub mod standard_load;
pub mod task;
pub mod unit;
