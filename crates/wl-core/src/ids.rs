//! ID prefixes for entities without a natural key.
//!
//! Tasks and assignments are identified by `{prefix}-{8 hex chars}`, generated
//! by the store; every other entity is keyed by its natural key (year, code,
//! account, name).

pub const PREFIX_TASK: &str = "tsk";
pub const PREFIX_ASSIGNMENT: &str = "asg";
