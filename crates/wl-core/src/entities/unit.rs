use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Tolerance when checking that the two mark fractions sum to one.
const MARK_FRACTION_EPSILON: f64 = 1e-6;

/// A taught course.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Unit {
    pub code: String,
    pub name: String,
    pub students: Option<u32>,
    pub credits: Option<u32>,
    pub lectures: u32,
    pub synoptic_lectures: u32,
    pub problem_classes: u32,
    pub coursework: u32,
    pub exams: u32,
    pub coursework_mark_fraction: Option<f64>,
    pub exam_mark_fraction: Option<f64>,
}

impl Unit {
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            students: None,
            credits: None,
            lectures: 0,
            synoptic_lectures: 0,
            problem_classes: 0,
            coursework: 0,
            exams: 0,
            coursework_mark_fraction: None,
            exam_mark_fraction: None,
        }
    }

    /// Lectures, synoptic lectures and problem classes together.
    #[must_use]
    pub const fn contact_sessions(&self) -> u32 {
        self.lectures + self.synoptic_lectures + self.problem_classes
    }

    /// Check that the mark fractions are both null or sum to one.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvariantViolation` when only one is set, either is
    /// outside `[0, 1]`, or their sum differs from one.
    pub fn check_mark_fractions(&self) -> Result<(), CoreError> {
        match (self.coursework_mark_fraction, self.exam_mark_fraction) {
            (None, None) => Ok(()),
            (Some(coursework), Some(exam)) => {
                if !(0.0..=1.0).contains(&coursework) || !(0.0..=1.0).contains(&exam) {
                    return Err(CoreError::invariant(format!(
                        "unit {}: mark fractions must lie in [0, 1]",
                        self.code
                    )));
                }
                if (coursework + exam - 1.0).abs() > MARK_FRACTION_EPSILON {
                    return Err(CoreError::invariant(format!(
                        "unit {}: mark fractions sum to {} rather than 1",
                        self.code,
                        coursework + exam
                    )));
                }
                Ok(())
            }
            _ => Err(CoreError::invariant(format!(
                "unit {}: mark fractions must both be set or both be null",
                self.code
            ))),
        }
    }
}
