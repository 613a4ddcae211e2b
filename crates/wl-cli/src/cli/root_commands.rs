use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Recalculate every task, assignment, staff and group load.
    Initialise,
    /// Freeze the current year into history and open the next one.
    NewYear(NewYearArgs),
    /// Replace the current year's rates and targets, then recalculate.
    StandardLoad(StandardLoadArgs),
    /// Check a load function expression without storing it.
    CheckExpression(CheckExpressionArgs),
    /// Per-staff and per-group balances for the current year.
    Balances,
}

impl Commands {
    /// The subcommand as typed on the command line.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Initialise => "initialise",
            Self::NewYear(_) => "new-year",
            Self::StandardLoad(_) => "standard-load",
            Self::CheckExpression(_) => "check-expression",
            Self::Balances => "balances",
        }
    }
}

/// Arguments for `workload new-year`.
#[derive(Clone, Debug, Args)]
pub struct NewYearArgs {
    /// The year to open.
    #[arg(long)]
    pub year: i32,
    /// TOML file overriding rates; unset rates carry forward.
    #[arg(long)]
    pub draft: Option<PathBuf>,
    /// Snapshot timestamp (RFC 3339), defaults to now.
    #[arg(long)]
    pub history_date: Option<DateTime<Utc>>,
}

/// Arguments for `workload standard-load`.
#[derive(Clone, Debug, Args)]
pub struct StandardLoadArgs {
    /// TOML file with the rates to change.
    #[arg(long)]
    pub draft: PathBuf,
}

/// Arguments for `workload check-expression`.
#[derive(Clone, Debug, Args)]
pub struct CheckExpressionArgs {
    pub expression: String,
}
