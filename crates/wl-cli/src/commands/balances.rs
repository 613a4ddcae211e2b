use wl_db::service::WorkloadService;

use crate::cli::GlobalFlags;
use crate::output::output;

/// Handle `workload balances`.
pub async fn handle(service: &WorkloadService, flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = service.balances().await?;
    output(&report, flags.format)
}
