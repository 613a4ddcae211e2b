//! Staff and group aggregation.

use wl_core::entities::Contract;
use wl_core::numeric::round_load;

use crate::workload::Workload;

/// Sum of the staff member's assignment loads.
#[must_use]
pub fn staff_assigned(workload: &Workload, account: &str) -> i64 {
    workload
        .assignments_of_staff(account)
        .map(|a| a.load_calc)
        .sum()
}

/// Store `load_assigned`. Returns whether it changed.
pub fn update_staff_assigned(workload: &mut Workload, account: &str) -> bool {
    let assigned = staff_assigned(workload, account);
    match workload.staff.get_mut(account) {
        Some(staff) if staff.load_assigned != assigned => {
            staff.load_assigned = assigned;
            true
        }
        _ => false,
    }
}

/// Fixed hours, or the FTE fraction of the effective per-FTE target.
#[must_use]
pub fn staff_target(contract: Contract, target_per_fte: i64) -> i64 {
    match contract {
        Contract::FixedHours { hours } => i64::from(hours),
        #[allow(clippy::cast_precision_loss)]
        Contract::Fte { fraction } => round_load(fraction * target_per_fte as f64),
    }
}

/// Store `load_target`. Returns whether it changed.
pub fn update_staff_target(workload: &mut Workload, account: &str) -> bool {
    let target_per_fte = workload.standard_load.effective_target_per_fte();
    match workload.staff.get_mut(account) {
        Some(staff) => {
            let target = staff_target(staff.contract, target_per_fte);
            if staff.load_target == target {
                return false;
            }
            staff.load_target = target;
            true
        }
        None => false,
    }
}

/// Sum of member balances.
#[must_use]
pub fn group_balance(workload: &Workload, code: &str) -> i64 {
    workload.members_of(code).map(|s| s.load_balance()).sum()
}

/// Store every group's `load_balance_final`.
pub fn update_groups(workload: &mut Workload) {
    let balances: Vec<(String, i64)> = workload
        .groups
        .keys()
        .map(|code| (code.clone(), group_balance(workload, code)))
        .collect();
    for (code, balance) in balances {
        if let Some(group) = workload.groups.get_mut(&code) {
            group.load_balance_final = balance;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wl_core::entities::{AcademicGroup, Assignment, Staff, StandardLoadDraft};

    fn workload() -> Workload {
        let mut workload = Workload::new(
            StandardLoadDraft {
                year: 2024,
                load_lecture: 0.0,
                load_lecture_first: 0.0,
                load_coursework_set: 0.0,
                load_coursework_credit: 0.0,
                load_coursework_marked: 0.0,
                load_exam_credit: 0.0,
                load_exam_marked: 0.0,
                load_fte_misc: 0.0,
                target_load_per_fte: 1000,
            }
            .into_standard_load(None),
        );
        workload.insert_group(AcademicGroup::new("A", "Astro", "Astrophysics"));
        workload.insert_staff(
            Staff::new("ab1", "A", Contract::Fte { fraction: 0.5 }, 2024).with_group("A"),
        );
        workload.insert_staff(
            Staff::new("cd2", "C", Contract::FixedHours { hours: 300 }, 2024).with_group("A"),
        );
        for (id, staff, load) in [
            ("asg-1", "ab1", 400),
            ("asg-2", "ab1", 200),
            ("asg-3", "cd2", 350),
        ] {
            let mut assignment = Assignment::new(id, format!("tsk-{id}"), staff);
            assignment.load_calc = load;
            workload.insert_assignment(assignment);
        }
        workload
    }

    #[test]
    fn assigned_sums_assignments() {
        let mut workload = workload();
        assert!(update_staff_assigned(&mut workload, "ab1"));
        assert_eq!(workload.staff["ab1"].load_assigned, 600);
        assert!(!update_staff_assigned(&mut workload, "ab1"));
    }

    #[test]
    fn targets_follow_contract() {
        let mut workload = workload();
        assert!(update_staff_target(&mut workload, "ab1"));
        assert!(update_staff_target(&mut workload, "cd2"));
        assert_eq!(workload.staff["ab1"].load_target, 500);
        assert_eq!(workload.staff["cd2"].load_target, 300);

        workload.standard_load.target_load_per_fte_calc = Some(901);
        assert!(update_staff_target(&mut workload, "ab1"));
        assert_eq!(workload.staff["ab1"].load_target, 451);
    }

    #[test]
    fn group_balance_sums_members() {
        let mut workload = workload();
        for account in ["ab1", "cd2"] {
            update_staff_assigned(&mut workload, account);
            update_staff_target(&mut workload, account);
        }
        update_groups(&mut workload);
        // (600 - 500) + (350 - 300)
        assert_eq!(workload.groups["A"].load_balance_final, 150);
    }
}
