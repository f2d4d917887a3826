//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.
//!
//! Precedence, lowest to highest: built-in defaults, the TOML file given with
//! `--config`, then individual CLI flags.

pub mod cli;
pub mod cli_convert;
pub mod toml;
pub mod validator;

use crate::sample::{SampleRange, DEFAULT_SAMPLE_LEN};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Complete run configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sample: SampleConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Sample generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleConfig {
    /// Number of values
    #[serde(default = "default_sample_len")]
    pub len: usize,
    /// Smallest value, inclusive
    #[serde(default = "default_min")]
    pub min: i32,
    /// Largest value, inclusive
    #[serde(default = "default_max")]
    pub max: i32,
    /// Fixed seed; random when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SampleConfig {
    pub fn range(&self) -> SampleRange {
        SampleRange::new(self.min, self.max)
    }
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            len: default_sample_len(),
            min: default_min(),
            max: default_max(),
            seed: None,
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Print JSON instead of text
    #[serde(default)]
    pub json: bool,
}

fn default_sample_len() -> usize {
    DEFAULT_SAMPLE_LEN
}

fn default_min() -> i32 {
    SampleRange::default().min
}

fn default_max() -> i32 {
    SampleRange::default().max
}

impl Config {
    /// Build the effective configuration from CLI arguments
    ///
    /// Loads `--config` if given, applies CLI overrides, and validates the
    /// result.
    pub fn from_cli(cli: &cli::Cli) -> Result<Self> {
        let base = match &cli.config {
            Some(path) => toml::parse_toml_file(path)?,
            None => Config::default(),
        };

        let config = toml::merge_cli_with_config(cli, base);
        validator::validate_config(&config)?;
        Ok(config)
    }
}
