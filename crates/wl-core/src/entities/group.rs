use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An academic group that staff balances roll up to.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AcademicGroup {
    /// Single-character key.
    pub code: String,
    pub short_name: String,
    pub name: String,
    pub load_balance_final: i64,
    pub load_balance_historic: i64,
}

impl AcademicGroup {
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        short_name: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            short_name: short_name.into(),
            name: name.into(),
            load_balance_final: 0,
            load_balance_historic: 0,
        }
    }
}
