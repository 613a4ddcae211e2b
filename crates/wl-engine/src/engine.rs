//! The public operations.
//!
//! Each operation validates the workload, works on a copy, and only replaces
//! the caller's state once everything has succeeded.

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use wl_config::EngineConfig;
use wl_core::entities::{LoadFunction, StandardLoadDraft};
use wl_core::history::HistoryLedger;
use wl_core::responses::BalanceReport;
use wl_expr::{Bindings, EXAMS, LECTURES, Limits, STUDENTS};

use crate::error::EngineError;
use crate::report::balance_report;
use crate::rollover::{RolloverOutcome, rollover};
use crate::solver::{RecalculationReport, recalculate};
use crate::workload::Workload;

#[derive(Debug, Clone, Copy, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    #[must_use]
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub const fn limits(&self) -> Limits {
        Limits {
            max_power_bits: self.config.max_power_bits,
        }
    }

    /// Recompute every derived field.
    ///
    /// # Errors
    ///
    /// Any [`EngineError`]; `workload` is untouched on error.
    pub fn recalculate(&self, workload: &mut Workload) -> Result<RecalculationReport, EngineError> {
        workload.validate(&self.config)?;
        let mut staged = workload.clone();
        let report = recalculate(&mut staged, &self.config).inspect_err(|err| {
            warn!(kind = err.kind(), "Recalculation abandoned: {err}");
        })?;
        *workload = staged;
        Ok(report)
    }

    /// Replace the current year's rates and targets, then recalculate.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvariantViolation`] if the draft is for another year,
    /// plus anything [`Engine::recalculate`] raises. `workload` is untouched
    /// on error.
    pub fn commit_standard_load(
        &self,
        workload: &mut Workload,
        draft: StandardLoadDraft,
    ) -> Result<RecalculationReport, EngineError> {
        if draft.year != workload.year() {
            return Err(EngineError::invariant(format!(
                "standard load draft is for {}, the current year is {}",
                draft.year,
                workload.year()
            )));
        }
        let mut staged = workload.clone();
        staged.standard_load =
            draft.into_standard_load(staged.standard_load.target_load_per_fte_calc);
        staged.validate(&self.config)?;
        let report = recalculate(&mut staged, &self.config)?;
        *workload = staged;
        info!(year = workload.year(), "Committed standard load");
        Ok(report)
    }

    /// Roll over into the draft's year, snapshotting at `history_date`.
    ///
    /// # Errors
    ///
    /// Any [`EngineError`]; `workload` and `ledger` are untouched on error.
    pub fn new_year(
        &self,
        workload: &mut Workload,
        ledger: &mut HistoryLedger,
        draft: StandardLoadDraft,
        history_date: DateTime<Utc>,
    ) -> Result<RolloverOutcome, EngineError> {
        workload.validate(&self.config)?;
        let mut staged = workload.clone();
        let mut staged_ledger = ledger.clone();
        let outcome = rollover(
            &mut staged,
            &mut staged_ledger,
            draft,
            history_date,
            &self.config,
        )
        .inspect_err(|err| warn!(kind = err.kind(), "Rollover abandoned: {err}"))?;

        *workload = staged;
        *ledger = staged_ledger;
        info!(
            previous_year = outcome.previous_year,
            year = workload.year(),
            snapshots = outcome.snapshots.len(),
            "Rolled over to new year"
        );
        Ok(outcome)
    }

    /// Trial-evaluate a load function with every conventional name bound to
    /// one, and check its plot range.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidExpression`] carrying the evaluator's message,
    /// or [`EngineError::InvariantViolation`] for an inverted plot range.
    pub fn validate_load_function(&self, function: &LoadFunction) -> Result<(), EngineError> {
        let bindings = Bindings::new()
            .with(STUDENTS, 1)
            .with(LECTURES, 1)
            .with(EXAMS, 1);
        wl_expr::evaluate(&function.expression, &bindings, self.limits())?;

        if let (Some(min), Some(max)) = (function.plot_minimum, function.plot_maximum) {
            if min >= max {
                return Err(EngineError::invariant(format!(
                    "load function {}: plot_minimum {min} is not below plot_maximum {max}",
                    function.name
                )));
            }
        }
        Ok(())
    }

    /// `(valid, message)` for an expression, `"OK"` when valid.
    #[must_use]
    pub fn check_expression(&self, expression: &str) -> (bool, String) {
        wl_expr::is_valid(expression, self.limits())
    }

    #[must_use]
    pub fn balances(&self, workload: &Workload) -> BalanceReport {
        balance_report(workload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_injection_attempt() {
        let engine = Engine::default();
        let err = engine
            .validate_load_function(&LoadFunction::new("evil", "__import__('os')"))
            .unwrap_err();
        assert_eq!(err.kind(), "invalid_expression");
        assert_eq!(
            err.to_string(),
            "Invalid expression: string literal is not permitted (position 11)"
        );
    }

    #[test]
    fn accepts_conventional_names() {
        let engine = Engine::default();
        engine
            .validate_load_function(&LoadFunction::new("mixed", "2*s + l/2 + e**2"))
            .unwrap();
    }

    #[test]
    fn inverted_plot_range_is_rejected() {
        let mut function = LoadFunction::new("per-student", "s");
        function.plot_minimum = Some(10.0);
        function.plot_maximum = Some(1.0);
        assert!(Engine::default().validate_load_function(&function).is_err());
    }

    #[test]
    fn oversized_load_function_is_an_invalid_expression() {
        let function = LoadFunction::new("runaway", format!("s{}", "+1".repeat(200_000)));
        let err = Engine::default().validate_load_function(&function).unwrap_err();
        assert_eq!(err.kind(), "invalid_expression");
        assert_eq!(
            err.to_string(),
            "Invalid expression: expression longer than 1024 tokens"
        );
    }

    #[test]
    fn check_expression_reports_ok() {
        assert_eq!(
            Engine::default().check_expression("s/2"),
            (true, "OK".to_string())
        );
        let (valid, message) = Engine::default().check_expression("s/0");
        assert!(!valid);
        assert_eq!(message, "division by zero");
    }
}
