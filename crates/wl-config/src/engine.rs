//! Engine limits.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Largest exponentiation bound accepted for the expression evaluator.
const MAX_POWER_BITS_CEILING: u32 = 1024;

const fn default_min_year() -> i32 {
    2000
}

const fn default_max_hours_fixed() -> u32 {
    2000
}

const fn default_cycle_limit() -> u32 {
    64
}

const fn default_max_power_bits() -> u32 {
    64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Minimum permitted academic year.
    #[serde(default = "default_min_year")]
    pub min_year: i32,

    /// Maximum permitted fixed hours per staff member.
    #[serde(default = "default_max_hours_fixed")]
    pub max_hours_fixed: u32,

    /// FTE solver cycle limit.
    #[serde(default = "default_cycle_limit")]
    pub cycle_limit: u32,

    /// Maximum bit-width of an exponentiation result in load functions.
    #[serde(default = "default_max_power_bits")]
    pub max_power_bits: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_year: default_min_year(),
            max_hours_fixed: default_max_hours_fixed(),
            cycle_limit: default_cycle_limit(),
            max_power_bits: default_max_power_bits(),
        }
    }
}

impl EngineConfig {
    /// Reject limits the engine cannot run with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a zero cycle limit or an
    /// exponentiation bound outside `1..=1024`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cycle_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "engine.cycle_limit".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.max_power_bits == 0 || self.max_power_bits > MAX_POWER_BITS_CEILING {
            return Err(ConfigError::InvalidValue {
                field: "engine.max_power_bits".into(),
                reason: format!("must lie in 1..={MAX_POWER_BITS_CEILING}"),
            });
        }
        Ok(())
    }
}
