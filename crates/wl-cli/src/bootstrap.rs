use std::path::Path;

use anyhow::Context;
use wl_config::WorkloadConfig;
use wl_db::service::WorkloadService;

use crate::cli::GlobalFlags;

/// Load layered configuration, applying the `--database` override.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<WorkloadConfig> {
    let mut config = WorkloadConfig::load_with_dotenv().context("failed to load configuration")?;
    if let Some(path) = &flags.database {
        config.database.path.clone_from(path);
    }
    tracing::debug!(
        database = %config.database.path,
        cycle_limit = config.engine.cycle_limit,
        "Loaded configuration"
    );
    Ok(config)
}

/// Open the configured database, creating its directory on first use.
pub async fn open_service(config: &WorkloadConfig) -> anyhow::Result<WorkloadService> {
    if !config.database.is_in_memory() {
        if let Some(parent) = Path::new(&config.database.path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create database directory {}", parent.display())
                })?;
            }
        }
    }
    Ok(WorkloadService::new_local(&config.database.path, config.engine).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_service_creates_database_directory() {
        let temp = tempfile::tempdir().expect("tempdir should create");
        let path = temp.path().join(".workload").join("workload.db");
        let mut config = WorkloadConfig::default();
        config.database.path = path.to_string_lossy().into_owned();

        open_service(&config).await.expect("service should open");

        assert!(path.is_file());
    }
}
