use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What a task is attached to.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "type", content = "code", rename_all = "snake_case")]
pub enum TaskScope {
    /// Attached to a unit (by unit code).
    Unit(String),
    /// Attached to an academic group (by group code).
    Group(String),
    /// Neither unit- nor group-scoped.
    #[default]
    Free,
}

/// Which branch of the load formula applies to a task.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskKind {
    /// Fixed hours plus an optional load function.
    #[default]
    Standard,
    /// Unit coordination; adds lecture, coursework and exam terms.
    Lead {
        coursework_fraction: f64,
        exam_fraction: f64,
    },
    /// Costs exactly one FTE's worth of hours.
    FullTime,
}

impl TaskKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Lead { .. } => "lead",
            Self::FullTime => "full_time",
        }
    }
}

/// A unit of teaching work whose load is assigned to staff.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Task {
    pub id: String,
    pub name: String,
    /// Editable display name; unique within its unit or group.
    pub title: String,
    pub scope: TaskScope,
    pub kind: TaskKind,
    pub is_required: bool,
    pub is_unique: bool,
    pub load_fixed: u32,
    pub load_fixed_first: u32,
    pub load_multiplier: f64,
    /// Load function name.
    pub load_function: Option<String>,
    pub students: Option<u32>,
    pub load_calc: i64,
    pub load_calc_first: i64,
}

impl Task {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            title: name.clone(),
            name,
            scope: TaskScope::Free,
            kind: TaskKind::Standard,
            is_required: false,
            is_unique: false,
            load_fixed: 0,
            load_fixed_first: 0,
            load_multiplier: 1.0,
            load_function: None,
            students: None,
            load_calc: 0,
            load_calc_first: 0,
        }
    }

    #[must_use]
    pub fn with_scope(mut self, scope: TaskScope) -> Self {
        self.scope = scope;
        self
    }

    #[must_use]
    pub const fn with_kind(mut self, kind: TaskKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub const fn with_load_fixed(mut self, load_fixed: u32, load_fixed_first: u32) -> Self {
        self.load_fixed = load_fixed;
        self.load_fixed_first = load_fixed_first;
        self
    }

    #[must_use]
    pub fn with_load_function(mut self, name: impl Into<String>) -> Self {
        self.load_function = Some(name.into());
        self
    }

    #[must_use]
    pub const fn with_students(mut self, students: u32) -> Self {
        self.students = Some(students);
        self
    }

    #[must_use]
    pub const fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.load_multiplier = multiplier;
        self
    }

    #[must_use]
    pub const fn is_lead(&self) -> bool {
        matches!(self.kind, TaskKind::Lead { .. })
    }

    #[must_use]
    pub const fn is_full_time(&self) -> bool {
        matches!(self.kind, TaskKind::FullTime)
    }

    #[must_use]
    pub fn unit_code(&self) -> Option<&str> {
        match &self.scope {
            TaskScope::Unit(code) => Some(code),
            _ => None,
        }
    }

    #[must_use]
    pub fn group_code(&self) -> Option<&str> {
        match &self.scope {
            TaskScope::Group(code) => Some(code),
            _ => None,
        }
    }
}
