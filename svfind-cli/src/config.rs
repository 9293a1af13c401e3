//! Configuration handling for svfind CLI
//!
//! Supports loading configuration from svfind.toml files with CLI argument overrides.

use anyhow::{Result, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use svfind_core::detect::{DEFAULT_MAX_OVERHANG, DEFAULT_MAX_SIZE};
use svfind_core::DetectParams;

use crate::error::{CliError, CliResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub detect: DetectConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectConfig {
    /// Maximum slack between the two alignments bracketing an insertion
    #[serde(default = "default_max_overhang")]
    pub max_overhang: u64,

    /// Insertions must be strictly shorter than this
    #[serde(default = "default_max_size")]
    pub max_size: u64,
}

fn default_max_overhang() -> u64 { DEFAULT_MAX_OVERHANG }
fn default_max_size() -> u64 { DEFAULT_MAX_SIZE }

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            max_overhang: default_max_overhang(),
            max_size: default_max_size(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                // Try to find svfind.toml in current directory
                let default_path = PathBuf::from("svfind.toml");
                if default_path.exists() {
                    log::info!("Loading configuration from: svfind.toml");
                    Self::load_from_file(&default_path)?
                } else {
                    log::debug!("Using default configuration");
                    Self::default()
                }
            }
        };

        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .map_err(CliError::from)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        Ok(config)
    }

    /// Generate example configuration file content
    pub fn example_toml() -> CliResult<String> {
        Ok(toml::to_string_pretty(&Self::default())?)
    }

    /// Detection parameters, with command-line values taking precedence
    pub fn detect_params(
        &self,
        max_overhang: Option<u64>,
        max_size: Option<u64>,
    ) -> CliResult<DetectParams> {
        let params = DetectParams::new(
            max_overhang.unwrap_or(self.detect.max_overhang),
            max_size.unwrap_or(self.detect.max_size),
        )?;
        Ok(params)
    }
}
