//! Staff update builder.

use serde::Serialize;
use wl_core::entities::Contract;
use wl_core::enums::Gender;

#[derive(Debug, Clone, Default, Serialize)]
pub struct StaffUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub academic_group: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract: Option<Contract>,
}

#[derive(Debug, Default)]
pub struct StaffUpdateBuilder(StaffUpdate);

impl StaffUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn academic_group(mut self, academic_group: Option<String>) -> Self {
        self.0.academic_group = Some(academic_group);
        self
    }

    #[must_use]
    pub const fn gender(mut self, gender: Gender) -> Self {
        self.0.gender = Some(gender);
        self
    }

    #[must_use]
    pub fn staff_type(mut self, staff_type: impl Into<String>) -> Self {
        self.0.staff_type = Some(staff_type.into());
        self
    }

    /// Replace the contract; both contract columns are rewritten together.
    #[must_use]
    pub const fn contract(mut self, contract: Contract) -> Self {
        self.0.contract = Some(contract);
        self
    }

    #[must_use]
    pub fn build(self) -> StaffUpdate {
        self.0
    }
}
