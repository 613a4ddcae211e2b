//! The in-memory workload graph and its invariant checks.
//!
//! A [`Workload`] holds one academic year's entities keyed by their natural
//! keys. The store loads it, the engine mutates its derived fields, and the
//! store writes those fields back.

use std::collections::{BTreeMap, BTreeSet};

use wl_config::EngineConfig;
use wl_core::entities::{
    AcademicGroup, Assignment, Contract, LoadFunction, Staff, StandardLoad, Task, TaskKind,
    TaskScope, Unit,
};

use crate::error::EngineError;

const MULTIPLIER_MIN: f64 = 0.1;
const MULTIPLIER_MAX: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Workload {
    pub standard_load: StandardLoad,
    /// Keyed by group code.
    pub groups: BTreeMap<String, AcademicGroup>,
    /// Keyed by staff account.
    pub staff: BTreeMap<String, Staff>,
    /// Keyed by unit code.
    pub units: BTreeMap<String, Unit>,
    /// Keyed by function name.
    pub load_functions: BTreeMap<String, LoadFunction>,
    /// Keyed by task ID.
    pub tasks: BTreeMap<String, Task>,
    /// Keyed by assignment ID.
    pub assignments: BTreeMap<String, Assignment>,
}

impl Workload {
    #[must_use]
    pub const fn new(standard_load: StandardLoad) -> Self {
        Self {
            standard_load,
            groups: BTreeMap::new(),
            staff: BTreeMap::new(),
            units: BTreeMap::new(),
            load_functions: BTreeMap::new(),
            tasks: BTreeMap::new(),
            assignments: BTreeMap::new(),
        }
    }

    pub fn insert_group(&mut self, group: AcademicGroup) {
        self.groups.insert(group.code.clone(), group);
    }

    pub fn insert_staff(&mut self, staff: Staff) {
        self.staff.insert(staff.account.clone(), staff);
    }

    pub fn insert_unit(&mut self, unit: Unit) {
        self.units.insert(unit.code.clone(), unit);
    }

    pub fn insert_load_function(&mut self, function: LoadFunction) {
        self.load_functions.insert(function.name.clone(), function);
    }

    pub fn insert_task(&mut self, task: Task) {
        self.tasks.insert(task.id.clone(), task);
    }

    pub fn insert_assignment(&mut self, assignment: Assignment) {
        self.assignments.insert(assignment.id.clone(), assignment);
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.standard_load.year
    }

    /// Assignments held by one staff member.
    pub fn assignments_of_staff<'a>(
        &'a self,
        account: &'a str,
    ) -> impl Iterator<Item = &'a Assignment> + 'a {
        self.assignments.values().filter(move |a| a.staff == account)
    }

    /// IDs of the assignments bound to one task.
    #[must_use]
    pub fn assignment_ids_of_task(&self, task_id: &str) -> Vec<String> {
        self.assignments
            .values()
            .filter(|a| a.task == task_id)
            .map(|a| a.id.clone())
            .collect()
    }

    /// Staff belonging to one academic group.
    pub fn members_of<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a Staff> + 'a {
        self.staff
            .values()
            .filter(move |s| s.academic_group.as_deref() == Some(group))
    }

    /// IDs of full-time tasks, in key order.
    #[must_use]
    pub fn full_time_task_ids(&self) -> Vec<String> {
        self.tasks
            .values()
            .filter(|t| t.is_full_time())
            .map(|t| t.id.clone())
            .collect()
    }

    /// Check every data-model invariant. Run at the start of each public
    /// operation; a violation aborts the operation untouched.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvariantViolation`] naming the first entity
    /// found in breach.
    pub fn validate(&self, config: &EngineConfig) -> Result<(), EngineError> {
        self.validate_standard_load(config)?;
        self.validate_staff(config)?;
        self.validate_units()?;
        self.validate_load_functions()?;
        self.validate_tasks()?;
        self.validate_assignments()?;
        Ok(())
    }

    fn validate_standard_load(&self, config: &EngineConfig) -> Result<(), EngineError> {
        let load = &self.standard_load;
        if load.year < config.min_year {
            return Err(EngineError::invariant(format!(
                "standard load year {} is before {}",
                load.year, config.min_year
            )));
        }
        for (field, rate) in load.rates() {
            if !rate.is_finite() || rate < 0.0 {
                return Err(EngineError::invariant(format!(
                    "standard load {}: {field} must be a non-negative number, got {rate}",
                    load.year
                )));
            }
        }
        Ok(())
    }

    fn validate_staff(&self, config: &EngineConfig) -> Result<(), EngineError> {
        for staff in self.staff.values() {
            match staff.contract {
                Contract::FixedHours { hours } => {
                    if hours == 0 || hours > config.max_hours_fixed {
                        return Err(EngineError::invariant(format!(
                            "staff {}: hours_fixed {hours} outside 1..={}",
                            staff.account, config.max_hours_fixed
                        )));
                    }
                }
                Contract::Fte { fraction } => {
                    if !(fraction > 0.0 && fraction <= 1.0) {
                        return Err(EngineError::invariant(format!(
                            "staff {}: fte_fraction {fraction} outside (0, 1]",
                            staff.account
                        )));
                    }
                }
            }
            if let Some(group) = &staff.academic_group {
                if !self.groups.contains_key(group) {
                    return Err(EngineError::invariant(format!(
                        "staff {}: academic group {group} does not exist",
                        staff.account
                    )));
                }
            }
            if staff.year != self.standard_load.year {
                return Err(EngineError::invariant(format!(
                    "staff {}: year {} does not match standard load {}",
                    staff.account, staff.year, self.standard_load.year
                )));
            }
        }
        Ok(())
    }

    fn validate_units(&self) -> Result<(), EngineError> {
        for unit in self.units.values() {
            unit.check_mark_fractions()?;
        }
        Ok(())
    }

    fn validate_load_functions(&self) -> Result<(), EngineError> {
        for function in self.load_functions.values() {
            if let (Some(min), Some(max)) = (function.plot_minimum, function.plot_maximum) {
                if min >= max {
                    return Err(EngineError::invariant(format!(
                        "load function {}: plot_minimum {min} is not below plot_maximum {max}",
                        function.name
                    )));
                }
            }
        }
        Ok(())
    }

    fn validate_tasks(&self) -> Result<(), EngineError> {
        let mut titles = BTreeSet::new();
        for task in self.tasks.values() {
            match &task.scope {
                TaskScope::Unit(code) => {
                    if !self.units.contains_key(code) {
                        return Err(EngineError::invariant(format!(
                            "task {}: unit {code} does not exist",
                            task.id
                        )));
                    }
                    if !titles.insert(("unit", code.as_str(), task.title.as_str())) {
                        return Err(EngineError::invariant(format!(
                            "task {}: title '{}' is already used in unit {code}",
                            task.id, task.title
                        )));
                    }
                }
                TaskScope::Group(code) => {
                    if !self.groups.contains_key(code) {
                        return Err(EngineError::invariant(format!(
                            "task {}: academic group {code} does not exist",
                            task.id
                        )));
                    }
                    if !titles.insert(("group", code.as_str(), task.title.as_str())) {
                        return Err(EngineError::invariant(format!(
                            "task {}: title '{}' is already used in group {code}",
                            task.id, task.title
                        )));
                    }
                }
                TaskScope::Free => {}
            }

            if let TaskKind::Lead {
                coursework_fraction,
                exam_fraction,
            } = task.kind
            {
                if task.unit_code().is_none() {
                    return Err(EngineError::invariant(format!(
                        "task {}: lead task is not scoped to a unit",
                        task.id
                    )));
                }
                for (field, value) in [
                    ("coursework_fraction", coursework_fraction),
                    ("exam_fraction", exam_fraction),
                ] {
                    if !(0.0..=1.0).contains(&value) {
                        return Err(EngineError::invariant(format!(
                            "task {}: {field} {value} outside [0, 1]",
                            task.id
                        )));
                    }
                }
            }

            if !(MULTIPLIER_MIN..=MULTIPLIER_MAX).contains(&task.load_multiplier) {
                return Err(EngineError::invariant(format!(
                    "task {}: load_multiplier {} outside [{MULTIPLIER_MIN}, {MULTIPLIER_MAX}]",
                    task.id, task.load_multiplier
                )));
            }

            if let Some(name) = &task.load_function {
                if !self.load_functions.contains_key(name) {
                    return Err(EngineError::invariant(format!(
                        "task {}: load function {name} does not exist",
                        task.id
                    )));
                }
            }
        }
        Ok(())
    }

    fn validate_assignments(&self) -> Result<(), EngineError> {
        let mut pairs = BTreeSet::new();
        for assignment in self.assignments.values() {
            if !self.tasks.contains_key(&assignment.task) {
                return Err(EngineError::invariant(format!(
                    "assignment {}: task {} does not exist",
                    assignment.id, assignment.task
                )));
            }
            if !self.staff.contains_key(&assignment.staff) {
                return Err(EngineError::invariant(format!(
                    "assignment {}: staff {} does not exist",
                    assignment.id, assignment.staff
                )));
            }
            if !pairs.insert((assignment.task.as_str(), assignment.staff.as_str())) {
                return Err(EngineError::invariant(format!(
                    "assignment {}: staff {} is already assigned to task {}",
                    assignment.id, assignment.staff, assignment.task
                )));
            }
        }
        Ok(())
    }
}
