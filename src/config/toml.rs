//! TOML configuration file parsing
//!
//! ```toml
//! [sample]
//! len = 10000
//! min = 0
//! max = 100
//! seed = 42
//!
//! [output]
//! json = false
//! ```
//!
//! Every key is optional.

use super::Config;
use crate::config::cli::Cli;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<Config> {
    let config: Config = ::toml::from_str(contents)
        .context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Merge CLI arguments with TOML configuration (CLI takes precedence)
pub fn merge_cli_with_config(cli: &Cli, mut config: Config) -> Config {
    if let Some(len) = cli.samples {
        config.sample.len = len;
    }
    if let Some(min) = cli.min {
        config.sample.min = min;
    }
    if let Some(max) = cli.max {
        config.sample.max = max;
    }
    if cli.seed.is_some() {
        config.sample.seed = cli.seed;
    }

    // A bare flag can only switch JSON on
    if cli.json {
        config.output.json = true;
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn test_parse_toml_basic() {
        let config = parse_toml_string(
            r#"
            [sample]
            len = 500
            min = -3
            max = 3
            seed = 11

            [output]
            json = true
            "#,
        )
        .unwrap();

        assert_eq!(config.sample.len, 500);
        assert_eq!(config.sample.min, -3);
        assert_eq!(config.sample.max, 3);
        assert_eq!(config.sample.seed, Some(11));
        assert!(config.output.json);
    }

    #[test]
    fn test_parse_toml_partial() {
        let config = parse_toml_string("[sample]\nseed = 5\n").unwrap();
        assert_eq!(config.sample.len, 10_000);
        assert_eq!(config.sample.max, 100);
        assert_eq!(config.sample.seed, Some(5));

        assert_eq!(parse_toml_string("").unwrap(), Config::default());
    }

    #[test]
    fn test_parse_toml_invalid() {
        assert!(parse_toml_string("[sample]\nlen = \"many\"\n").is_err());
    }

    #[test]
    fn test_parse_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[sample]\nlen = 42").unwrap();

        let config = parse_toml_file(file.path()).unwrap();
        assert_eq!(config.sample.len, 42);
    }

    #[test]
    fn test_parse_toml_missing_file() {
        let err = parse_toml_file(Path::new("/nonexistent/procbench.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_merge_cli_overrides_file() {
        let file_config = parse_toml_string("[sample]\nlen = 42\nmin = 1\nseed = 3\n").unwrap();
        let cli = Cli::try_parse_from(["procbench", "-n", "7", "--seed", "4"]).unwrap();

        let merged = merge_cli_with_config(&cli, file_config);
        assert_eq!(merged.sample.len, 7);
        assert_eq!(merged.sample.min, 1);
        assert_eq!(merged.sample.seed, Some(4));
        assert!(!merged.output.json);
    }
}
