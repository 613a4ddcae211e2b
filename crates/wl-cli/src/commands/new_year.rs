use anyhow::Context;
use chrono::Utc;
use wl_core::responses::NewYearResponse;
use wl_db::service::WorkloadService;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::NewYearArgs;
use crate::commands::draft::DraftOverrides;
use crate::output::output;

/// Handle `workload new-year`.
pub async fn handle(
    args: &NewYearArgs,
    service: &WorkloadService,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let overrides = match &args.draft {
        Some(path) => DraftOverrides::read(path)?,
        None => DraftOverrides::default(),
    };
    let current = service
        .latest_standard_load()
        .await
        .context("no standard load to roll over")?;
    let draft = overrides.apply(&current, args.year);
    let history_date = args.history_date.unwrap_or_else(Utc::now);

    let outcome = service.new_year(draft, history_date).await?;
    output(
        &NewYearResponse {
            previous_year: outcome.previous_year,
            year: args.year,
            history_date: outcome.history_date,
            snapshots: u32::try_from(outcome.snapshots.len()).unwrap_or(u32::MAX),
            cycles: outcome.report.cycles,
        },
        flags.format,
    )
}
