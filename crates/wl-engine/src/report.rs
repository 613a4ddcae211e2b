//! Balance report over the current workload.

use wl_core::responses::{BalanceReport, GroupBalance, StaffBalance};

use crate::workload::Workload;

/// Per-staff and per-group balances, in key order.
#[must_use]
pub fn balance_report(workload: &Workload) -> BalanceReport {
    BalanceReport {
        year: workload.year(),
        target_load_per_fte: workload.standard_load.effective_target_per_fte(),
        staff: workload
            .staff
            .values()
            .map(|staff| StaffBalance {
                account: staff.account.clone(),
                name: staff.name.clone(),
                academic_group: staff.academic_group.clone(),
                load_assigned: staff.load_assigned,
                load_target: staff.load_target,
                load_balance: staff.load_balance(),
                load_balance_historic: staff.load_balance_historic,
            })
            .collect(),
        groups: workload
            .groups
            .values()
            .map(|group| GroupBalance {
                code: group.code.clone(),
                name: group.name.clone(),
                load_balance_final: group.load_balance_final,
                load_balance_historic: group.load_balance_historic,
            })
            .collect(),
    }
}
