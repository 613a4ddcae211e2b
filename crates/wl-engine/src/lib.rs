//! # wl-engine
//!
//! Load calculation and FTE convergence for teaching workload balancing.
//!
//! The engine is synchronous and works on an in-memory [`Workload`]: the
//! persistent store loads the graph, calls one of the [`Engine`] operations,
//! and writes the derived fields back in a single transaction.
//!
//! - [`formula`]: per-task load for unit leads, full-time and other tasks
//! - [`loader`]: assignment loads
//! - [`aggregate`]: staff assigned/target loads and group balances
//! - [`solver`]: full recalculation with the FTE fixed-point loop
//! - [`rollover`]: year rollover with history snapshots

pub mod aggregate;
pub mod engine;
pub mod error;
pub mod formula;
pub mod loader;
pub mod report;
pub mod rollover;
pub mod solver;
pub mod workload;

pub use engine::Engine;
pub use error::EngineError;
pub use rollover::RolloverOutcome;
pub use solver::RecalculationReport;
pub use workload::Workload;
