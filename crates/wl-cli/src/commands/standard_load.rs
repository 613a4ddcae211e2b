use anyhow::Context;
use wl_core::responses::RecalculateResponse;
use wl_db::service::WorkloadService;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::StandardLoadArgs;
use crate::commands::draft::DraftOverrides;
use crate::output::output;

/// Handle `workload standard-load`.
pub async fn handle(
    args: &StandardLoadArgs,
    service: &WorkloadService,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let overrides = DraftOverrides::read(&args.draft)?;
    let current = service
        .latest_standard_load()
        .await
        .context("no standard load to update")?;
    let draft = overrides.apply(&current, current.year);

    let report = service.commit_standard_load(draft).await?;
    output(
        &RecalculateResponse {
            success: true,
            cycles: report.cycles,
            target_load_per_fte: report.target_load_per_fte,
        },
        flags.format,
    )
}
