// Optimizer configuration

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::LoadError;
use crate::models::Cost;

/// Tunable parameters of the cost model and the search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Travel cost charged per statute mile of the route
    #[serde(default = "default_cost_per_mile")]
    pub cost_per_mile: Cost,

    /// Upper bound on the number of store combinations a single call may evaluate
    #[serde(default = "default_max_combinations")]
    pub max_combinations: u64,

    /// Evaluate combinations on the rayon thread pool
    #[serde(default)]
    pub parallel: bool,
}

fn default_cost_per_mile() -> Cost {
    0.6
}
fn default_max_combinations() -> u64 {
    200_000
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            cost_per_mile: default_cost_per_mile(),
            max_combinations: default_max_combinations(),
            parallel: false,
        }
    }
}

impl OptimizerConfig {
    /// Parses and validates a JSON configuration; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let config: OptimizerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a JSON configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Rejects values the cost model cannot use
    pub fn validate(&self) -> Result<(), LoadError> {
        if !self.cost_per_mile.is_finite() || self.cost_per_mile < 0.0 {
            return Err(LoadError::Config(format!(
                "cost_per_mile must be a finite, non-negative number, got {}",
                self.cost_per_mile
            )));
        }
        if self.max_combinations == 0 {
            return Err(LoadError::Config(
                "max_combinations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
