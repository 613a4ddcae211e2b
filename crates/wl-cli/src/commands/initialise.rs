use wl_core::responses::RecalculateResponse;
use wl_db::service::WorkloadService;

use crate::cli::GlobalFlags;
use crate::output::output;

/// Handle `workload initialise`.
pub async fn handle(service: &WorkloadService, flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = service.recalculate().await?;
    tracing::info!(
        tasks = report.tasks_changed,
        assignments = report.assignments_changed,
        staff = report.staff_changed,
        "Recalculated"
    );
    output(
        &RecalculateResponse {
            success: true,
            cycles: report.cycles,
            target_load_per_fte: report.target_load_per_fte,
        },
        flags.format,
    )
}
