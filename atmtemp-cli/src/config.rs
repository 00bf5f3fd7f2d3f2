//! TOML configuration for model runs.

use anyhow::{Context, Result};
use atmtemp_core::parameters::{AtmosphereParameters, RadiationParameters};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level run configuration.
///
/// Every table and key is optional; missing values take the model defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub atmosphere: AtmosphereParameters,
    pub radiation: RadiationParameters,
    pub output: OutputConfig,
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: "./OUTPUT/").
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Whether to also write the optical-depth table (default: false).
    #[serde(default)]
    pub save_optical_depth: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            save_optical_depth: false,
        }
    }
}

fn default_output_dir() -> String {
    "./OUTPUT/".into()
}

impl Configuration {
    /// Check the model parameters without running anything.
    pub fn validate(&self) -> Result<()> {
        self.atmosphere
            .validate()
            .context("invalid [atmosphere] parameters")?;
        self.radiation
            .validate()
            .context("invalid [radiation] parameters")?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).context("failed to serialise the configuration")
    }
}

/// Parse a configuration from TOML text and validate it.
pub fn parse_config(content: &str) -> Result<Configuration> {
    let config: Configuration = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load, parse and validate a TOML configuration file.
pub fn load_config(path: &Path) -> Result<Configuration> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_config(&content).with_context(|| format!("invalid configuration in {}", path.display()))
}
