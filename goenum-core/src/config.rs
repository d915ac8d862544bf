//! Configuration loading from goenum.toml.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

use crate::enums::{CarryPolicy, EnumTypeSpec, ExtractConfig};
use crate::error::GoenumError;

/// Name of the config file looked up in the scan root.
pub const CONFIG_FILE: &str = "goenum.toml";

/// Main configuration structure for goenum.toml.
#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GoenumConfig {
    /// Enum types to collect.
    #[serde(default)]
    pub types: Vec<EnumTypeSpec>,
    pub carry_policy: Option<CarryPolicy>,
    pub include_tests: Option<bool>,
    pub discover: Option<bool>,
    pub discover_pattern: Option<String>,
    /// Extra directory names to skip while scanning.
    pub exclude: Option<Vec<String>>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// Output format configuration.
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct OutputConfig {
    /// Output format: "plain" or "json".
    pub format: Option<String>,
}

impl GoenumConfig {
    /// Extraction settings described by this file alone.
    pub fn extract_config(&self) -> ExtractConfig {
        ExtractConfig {
            types: self.types.clone(),
            carry_policy: self.carry_policy.unwrap_or_default(),
            discover: self.discover.unwrap_or(false),
            discover_pattern: self.discover_pattern.clone(),
        }
    }

    pub fn wants_json(&self) -> bool {
        self.output
            .as_ref()
            .and_then(|o| o.format.as_deref())
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }
}

/// Loads configuration from goenum.toml in `root` if it exists.
pub fn load_config(root: &Path) -> Result<Option<GoenumConfig>> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    load_config_file(&path).map(Some)
}

/// Loads configuration from an explicit path, which must exist.
pub fn load_config_file(path: &Path) -> Result<GoenumConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let cfg = toml::from_str(&content).map_err(|e| GoenumError::config(path, e.to_string()))?;
    Ok(cfg)
}
