//! Task update builder.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_unique: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_fixed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_fixed_first: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_multiplier: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_function: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub students: Option<Option<u32>>,
}

#[derive(Debug, Default)]
pub struct TaskUpdateBuilder(TaskUpdate);

impl TaskUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Some(title.into());
        self
    }

    #[must_use]
    pub const fn is_required(mut self, is_required: bool) -> Self {
        self.0.is_required = Some(is_required);
        self
    }

    #[must_use]
    pub const fn is_unique(mut self, is_unique: bool) -> Self {
        self.0.is_unique = Some(is_unique);
        self
    }

    #[must_use]
    pub const fn load_fixed(mut self, load_fixed: u32, load_fixed_first: u32) -> Self {
        self.0.load_fixed = Some(load_fixed);
        self.0.load_fixed_first = Some(load_fixed_first);
        self
    }

    #[must_use]
    pub const fn load_multiplier(mut self, load_multiplier: f64) -> Self {
        self.0.load_multiplier = Some(load_multiplier);
        self
    }

    #[must_use]
    pub fn load_function(mut self, load_function: Option<String>) -> Self {
        self.0.load_function = Some(load_function);
        self
    }

    #[must_use]
    pub const fn students(mut self, students: Option<u32>) -> Self {
        self.0.students = Some(students);
        self
    }

    #[must_use]
    pub fn build(self) -> TaskUpdate {
        self.0
    }
}
