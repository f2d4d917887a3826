//! Configuration validation

use super::*;
use anyhow::Result;

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_sample(&config.sample)?;
    Ok(())
}

/// Validate sample configuration
pub fn validate_sample(sample: &SampleConfig) -> Result<()> {
    if sample.len == 0 {
        anyhow::bail!("sample len must be at least 1");
    }

    if sample.min > sample.max {
        anyhow::bail!(
            "sample min ({}) must not exceed max ({})",
            sample.min,
            sample.max
        );
    }

    Ok(())
}
