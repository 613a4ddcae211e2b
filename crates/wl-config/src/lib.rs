//! # wl-config
//!
//! Layered configuration loading for the workload engine using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`WORKLOAD_*` prefix, `__` as separator)
//! 2. Project-level `.workload/config.toml`
//! 3. User-level `~/.config/workload/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `WORKLOAD_ENGINE__CYCLE_LIMIT` -> `engine.cycle_limit`,
//! `WORKLOAD_DATABASE__PATH` -> `database.path`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use wl_config::WorkloadConfig;
//!
//! let config = WorkloadConfig::load_with_dotenv().expect("config");
//! println!("cycle limit: {}", config.engine.cycle_limit);
//! ```

mod database;
mod engine;
mod error;

pub use database::DatabaseConfig;
pub use engine::EngineConfig;
pub use error::ConfigError;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WorkloadConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl WorkloadConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or the engine limits are invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.engine.validate()?;
        Ok(config)
    }

    /// Load configuration after reading `.env` from the current directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or the engine limits are invalid.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".workload/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("WORKLOAD_").split("__"))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("workload").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = WorkloadConfig::default();
        assert_eq!(config.engine.cycle_limit, 64);
        assert_eq!(config.database.path, ".workload/workload.db");
    }

    #[test]
    fn figment_builds_without_files() {
        figment::Jail::expect_with(|_jail| {
            let config: WorkloadConfig = WorkloadConfig::figment().extract()?;
            assert_eq!(config.engine.min_year, 2000);
            assert_eq!(config.engine.max_hours_fixed, 2000);
            Ok(())
        });
    }
}
