//! Scenario replay command

use std::path::Path;

use anyhow::{Context, Result};
use ecu_drive::sim::{Scenario, run_scenario};

use crate::commands::config;
use crate::error::CliError;
use crate::output;

pub fn execute(scenario_path: &Path, config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = config::load_or_default(config_path)?;
    let scenario = Scenario::load(scenario_path)
        .map_err(CliError::Scenario)
        .with_context(|| format!("Loading scenario {}", scenario_path.display()))?;

    tracing::info!(
        phases = scenario.phases.len(),
        duration_ms = u64::try_from(scenario.duration().as_millis()).unwrap_or(u64::MAX),
        "Replaying scenario"
    );
    let run = run_scenario(config, &scenario).map_err(CliError::Scenario)?;
    output::print_scenario_run(&scenario, &run, json);
    Ok(())
}
