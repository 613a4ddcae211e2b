use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Gender;
use crate::errors::CoreError;

/// How a staff member's target load is defined.
///
/// Exactly one of fixed hours or an FTE fraction applies; the two are stored
/// as separate nullable columns and [`Contract::from_columns`] enforces that
/// exactly one is present.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(tag = "basis", rename_all = "snake_case")]
pub enum Contract {
    FixedHours { hours: u32 },
    Fte { fraction: f64 },
}

impl Contract {
    /// Build a contract from the two nullable storage columns.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvariantViolation` unless exactly one column is set.
    pub fn from_columns(
        account: &str,
        hours_fixed: Option<i64>,
        fte_fraction: Option<f64>,
    ) -> Result<Self, CoreError> {
        match (hours_fixed, fte_fraction) {
            (Some(hours), None) => u32::try_from(hours)
                .map(|hours| Self::FixedHours { hours })
                .map_err(|_| {
                    CoreError::invariant(format!(
                        "staff {account}: hours_fixed {hours} out of range"
                    ))
                }),
            (None, Some(fraction)) => Ok(Self::Fte { fraction }),
            (Some(_), Some(_)) => Err(CoreError::invariant(format!(
                "staff {account}: both hours_fixed and fte_fraction are set"
            ))),
            (None, None) => Err(CoreError::invariant(format!(
                "staff {account}: neither hours_fixed nor fte_fraction is set"
            ))),
        }
    }

    #[must_use]
    pub const fn hours_fixed(self) -> Option<u32> {
        match self {
            Self::FixedHours { hours } => Some(hours),
            Self::Fte { .. } => None,
        }
    }

    #[must_use]
    pub const fn fte_fraction(self) -> Option<f64> {
        match self {
            Self::Fte { fraction } => Some(fraction),
            Self::FixedHours { .. } => None,
        }
    }
}

/// A member of staff and their derived load figures.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Staff {
    /// Short account name, the natural key.
    pub account: String,
    pub name: String,
    /// Academic group code.
    pub academic_group: Option<String>,
    pub gender: Gender,
    pub staff_type: String,
    pub contract: Contract,
    pub load_target: i64,
    pub load_assigned: i64,
    /// Frozen balance; zero on live rows, set only in snapshots.
    pub load_balance_final: i64,
    pub load_balance_historic: i64,
    /// Year of the standard load this row belongs to.
    pub year: i32,
}

impl Staff {
    #[must_use]
    pub fn new(
        account: impl Into<String>,
        name: impl Into<String>,
        contract: Contract,
        year: i32,
    ) -> Self {
        Self {
            account: account.into(),
            name: name.into(),
            academic_group: None,
            gender: Gender::Unspecified,
            staff_type: String::new(),
            contract,
            load_target: 0,
            load_assigned: 0,
            load_balance_final: 0,
            load_balance_historic: 0,
            year,
        }
    }

    #[must_use]
    pub fn with_group(mut self, code: impl Into<String>) -> Self {
        self.academic_group = Some(code.into());
        self
    }

    /// Current balance: assigned minus target, positive means overloaded.
    #[must_use]
    pub const fn load_balance(&self) -> i64 {
        self.load_assigned - self.load_target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_requires_exactly_one_column() {
        assert_eq!(
            Contract::from_columns("ab1", Some(400), None).unwrap(),
            Contract::FixedHours { hours: 400 }
        );
        assert_eq!(
            Contract::from_columns("ab1", None, Some(0.5)).unwrap(),
            Contract::Fte { fraction: 0.5 }
        );
        assert!(matches!(
            Contract::from_columns("ab1", Some(400), Some(0.5)),
            Err(CoreError::InvariantViolation(_))
        ));
        assert!(matches!(
            Contract::from_columns("ab1", None, None),
            Err(CoreError::InvariantViolation(_))
        ));
    }

    #[test]
    fn negative_hours_are_rejected() {
        assert!(Contract::from_columns("ab1", Some(-1), None).is_err());
    }

    #[test]
    fn balance_is_assigned_minus_target() {
        let mut staff = Staff::new("ab1", "A. B.", Contract::Fte { fraction: 1.0 }, 2024);
        staff.load_assigned = 800;
        staff.load_target = 900;
        assert_eq!(staff.load_balance(), -100);
    }
}
