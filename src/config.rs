//! Pipeline configuration
//!
//! The YAML config file selects which records survive (`filter_records`) and
//! which transforms are applied to each survivor (`cleaners`). Both keys are
//! optional; omitting one disables that stage.
//!
//! Cleaner entries are compiled into typed [`Cleaner`] variants at load time
//! so unknown function names and malformed parameters fail fast, before any
//! file is touched.

use crate::clean::{Cleaner, CleanerSpec};
use crate::error::{Error, Result};
use crate::filter::FilterSpec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Raw configuration as it appears in the YAML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WashConfig {
    /// Predicates a record must pass to be kept
    #[serde(default)]
    pub filter_records: Vec<FilterSpec>,

    /// Ordered transforms applied to each surviving record
    #[serde(default)]
    pub cleaners: Vec<CleanerSpec>,
}

/// Validated configuration with cleaners compiled for the worker hot path
#[derive(Debug, Clone, Default)]
pub struct CompiledConfig {
    /// Filter predicates, evaluated as a conjunction
    pub filters: Vec<FilterSpec>,

    /// Compiled cleaning transforms, applied in order
    pub cleaners: Vec<Cleaner>,
}

/// Load and compile a configuration from a YAML file
pub fn load_config(path: impl AsRef<Path>) -> Result<CompiledConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read config file '{}': {e}",
            path.display()
        ))
    })?;
    load_config_from_str(&content)
}

/// Load and compile a configuration from a YAML string
pub fn load_config_from_str(yaml: &str) -> Result<CompiledConfig> {
    let raw: WashConfig = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse config YAML: {e}")))?;
    compile_config(raw)
}

/// Validate the raw config and compile its cleaner specs
fn compile_config(raw: WashConfig) -> Result<CompiledConfig> {
    for (index, filter) in raw.filter_records.iter().enumerate() {
        if filter.path.is_empty() {
            return Err(Error::config(format!(
                "filter_records[{index}] has an empty path"
            )));
        }
    }

    let cleaners = raw
        .cleaners
        .iter()
        .map(Cleaner::from_spec)
        .collect::<Result<Vec<_>>>()?;

    Ok(CompiledConfig {
        filters: raw.filter_records,
        cleaners,
    })
}
