//! CLI response types returned as JSON by `workload` commands.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Response from `workload initialise` and `workload standard-load`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RecalculateResponse {
    pub success: bool,
    pub cycles: u32,
    pub target_load_per_fte: i64,
}

/// Response from `workload new-year`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewYearResponse {
    pub previous_year: i32,
    pub year: i32,
    pub history_date: DateTime<Utc>,
    pub snapshots: u32,
    pub cycles: u32,
}

/// Response from `workload check-expression`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ExpressionCheckResponse {
    pub expression: String,
    pub valid: bool,
    pub message: String,
}

/// One staff row of a balance report.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StaffBalance {
    pub account: String,
    pub name: String,
    pub academic_group: Option<String>,
    pub load_assigned: i64,
    pub load_target: i64,
    pub load_balance: i64,
    pub load_balance_historic: i64,
}

/// One academic group row of a balance report.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GroupBalance {
    pub code: String,
    pub name: String,
    pub load_balance_final: i64,
    pub load_balance_historic: i64,
}

/// Response from `workload balances`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BalanceReport {
    pub year: i32,
    pub target_load_per_fte: i64,
    pub staff: Vec<StaffBalance>,
    pub groups: Vec<GroupBalance>,
}
