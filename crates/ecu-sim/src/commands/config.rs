//! Configuration check command

use std::path::Path;

use anyhow::{Context, Result};
use ecu_drive::EcuConfig;

use crate::error::CliError;
use crate::output;

pub fn execute(path: &Path, json: bool) -> Result<()> {
    let config = load(path)?;
    output::print_config_summary(&config, json);
    Ok(())
}

/// Load and validate a configuration file, or the defaults when `path` is `None`.
pub fn load_or_default(path: Option<&Path>) -> Result<EcuConfig> {
    match path {
        Some(path) => load(path),
        None => Ok(EcuConfig::default()),
    }
}

fn load(path: &Path) -> Result<EcuConfig> {
    EcuConfig::load(path)
        .map_err(CliError::InvalidConfiguration)
        .with_context(|| format!("Checking configuration {}", path.display()))
}
