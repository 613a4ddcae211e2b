//! Assignment update builder.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct AssignmentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub students: Option<Option<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_first_time: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_provisional: Option<bool>,
}

#[derive(Debug, Default)]
pub struct AssignmentUpdateBuilder(AssignmentUpdate);

impl AssignmentUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn students(mut self, students: Option<u32>) -> Self {
        self.0.students = Some(students);
        self
    }

    #[must_use]
    pub const fn is_first_time(mut self, is_first_time: bool) -> Self {
        self.0.is_first_time = Some(is_first_time);
        self
    }

    #[must_use]
    pub const fn is_provisional(mut self, is_provisional: bool) -> Self {
        self.0.is_provisional = Some(is_provisional);
        self
    }

    #[must_use]
    pub fn build(self) -> AssignmentUpdate {
        self.0
    }
}
