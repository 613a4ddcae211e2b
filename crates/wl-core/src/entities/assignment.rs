use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Binding of one staff member to one task.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Assignment {
    pub id: String,
    /// Task ID.
    pub task: String,
    /// Staff account.
    pub staff: String,
    /// Per-assignment student count, overriding the task's.
    pub students: Option<u32>,
    pub is_first_time: bool,
    pub is_provisional: bool,
    pub load_calc: i64,
}

impl Assignment {
    #[must_use]
    pub fn new(id: impl Into<String>, task: impl Into<String>, staff: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            task: task.into(),
            staff: staff.into(),
            students: None,
            is_first_time: false,
            is_provisional: false,
            load_calc: 0,
        }
    }
}
