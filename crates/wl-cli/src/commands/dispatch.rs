use wl_db::service::WorkloadService;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    service: &WorkloadService,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Initialise => commands::initialise::handle(service, flags).await,
        Commands::NewYear(args) => commands::new_year::handle(&args, service, flags).await,
        Commands::StandardLoad(args) => {
            commands::standard_load::handle(&args, service, flags).await
        }
        Commands::Balances => commands::balances::handle(service, flags).await,
        Commands::CheckExpression(_) => {
            anyhow::bail!("check-expression runs without a database")
        }
    }
}
