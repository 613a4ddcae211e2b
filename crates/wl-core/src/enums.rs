//! Entity kinds and small classification enums.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! and expose `as_str()` for SQL storage.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// EntityKind
// ---------------------------------------------------------------------------

/// Every kind of entity that can be snapshotted into history.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    StandardLoad,
    AcademicGroup,
    Staff,
    Unit,
    LoadFunction,
    Task,
    Assignment,
}

impl EntityKind {
    /// All kinds, in the order snapshots are written at rollover.
    pub const ALL: [Self; 7] = [
        Self::StandardLoad,
        Self::Staff,
        Self::Assignment,
        Self::Task,
        Self::Unit,
        Self::LoadFunction,
        Self::AcademicGroup,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StandardLoad => "standard_load",
            Self::AcademicGroup => "academic_group",
            Self::Staff => "staff",
            Self::Unit => "unit",
            Self::LoadFunction => "load_function",
            Self::Task => "task",
            Self::Assignment => "assignment",
        }
    }

    /// Whether snapshots of this kind carry a frozen `load_balance_final`.
    #[must_use]
    pub const fn carries_balance(self) -> bool {
        matches!(self, Self::Staff | Self::AcademicGroup)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Gender
// ---------------------------------------------------------------------------

/// Recorded gender of a staff member, used only for reporting.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Female,
    Male,
    Other,
    #[default]
    Unspecified,
}

impl Gender {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Female => "female",
            Self::Male => "male",
            Self::Other => "other",
            Self::Unspecified => "unspecified",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_kind_serializes_snake_case() {
        let json = serde_json::to_string(&EntityKind::LoadFunction).unwrap();
        assert_eq!(json, "\"load_function\"");
        assert_eq!(EntityKind::LoadFunction.as_str(), "load_function");
    }

    #[test]
    fn as_str_matches_serde_for_every_kind() {
        for kind in EntityKind::ALL {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json.as_str(), Some(kind.as_str()));
        }
    }

    #[test]
    fn only_staff_and_groups_carry_balances() {
        let carrying: Vec<_> = EntityKind::ALL
            .into_iter()
            .filter(|k| k.carries_balance())
            .collect();
        assert_eq!(carrying, vec![EntityKind::Staff, EntityKind::AcademicGroup]);
    }

    #[test]
    fn gender_defaults_to_unspecified() {
        assert_eq!(Gender::default(), Gender::Unspecified);
    }
}
