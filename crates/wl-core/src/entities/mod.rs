//! Entity structs for the workload data model.
//!
//! Each entity maps to a table in the libSQL store. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema`; the serialized form is also
//! the payload of history snapshots.

mod assignment;
mod group;
mod load_function;
mod staff;
mod standard_load;
mod task;
mod unit;

pub use assignment::Assignment;
pub use group::AcademicGroup;
pub use load_function::LoadFunction;
pub use staff::{Contract, Staff};
pub use standard_load::{StandardLoad, StandardLoadDraft};
pub use task::{Task, TaskKind, TaskScope};
pub use unit::Unit;
