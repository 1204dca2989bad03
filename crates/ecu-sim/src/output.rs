//! Output formatting for CLI responses

use anyhow::Error;
use colored::*;
use ecu_drive::prelude::*;
use ecu_drive::sim::{Scenario, ScenarioRun, ScenarioStep};
use serde_json::json;

use crate::commands::table::TableLookup;
use crate::error::CliError;

fn print_json(value: &serde_json::Value, what: &str) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format {what} as JSON: {e}"),
    }
}

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let kind = error
        .downcast_ref::<CliError>()
        .map_or("Error", CliError::kind);
    print_json(
        &json!({
            "success": false,
            "error": {
                "message": format!("{error:#}"),
                "type": kind
            }
        }),
        "error",
    );
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

/// Print a validated configuration
pub fn print_config_summary(config: &EcuConfig, json: bool) {
    if json {
        print_json(&json!({ "success": true, "config": config }), "configuration");
        return;
    }

    println!("{} {}", "✓".green(), "Configuration OK".bold());
    println!("  Control period: {} ms", config.control_period_ms);
    println!("  Housekeeping period: {} ms", config.housekeeping_period_ms);
    println!("  Throttle range: 0..={}", config.throttle_max());
    println!(
        "  Current limits: accel {} mA, regen {} mA",
        config.current_limits.accel_max_ma, config.current_limits.regen_max_ma
    );
    println!("  Cooling duty max: {}", config.duty_max);
    let t = &config.plausibility;
    println!(
        "  APPS disagreement: {:.1} points for {} ms",
        t.apps_disagreement_points, t.apps_disagreement_window_ms
    );
    println!(
        "  BPPC: trip above {:.0}%, re-arm below {:.0}%",
        t.bppc_trip_fraction * 100.0,
        t.bppc_rearm_fraction * 100.0
    );
    println!(
        "  Aero opens above {:.0}% accel",
        config.aero.open_accel_fraction * 100.0
    );
    let tables = if config.tables.is_some() {
        "custom".yellow()
    } else {
        "reference".normal()
    };
    println!("  Calibration tables: {tables}");
}

/// Print a reference table lookup
pub fn print_table_lookup(lookup: &TableLookup, json: bool) {
    if json {
        print_json(&json!({ "success": true, "lookup": lookup }), "lookup");
        return;
    }
    println!(
        "{}[{}] = {:.4}  ({} of {} {})",
        lookup.table.bold(),
        lookup.key,
        lookup.fraction,
        lookup.scaled.to_string().cyan(),
        lookup.full_scale,
        lookup.unit
    );
}

fn active_faults(faults: FaultFlags) -> Vec<String> {
    faults.active().map(|f| f.to_string()).collect()
}

fn state_label(state: DriveState) -> ColoredString {
    let text = state.to_string();
    let label = format!("{text:<7}");
    match state {
        DriveState::Off => label.red(),
        DriveState::Neutral => label.yellow(),
        DriveState::Drive => label.green(),
    }
}

fn print_step(scenario: &Scenario, step: &ScenarioStep) {
    let report = &step.report;
    let phase = scenario
        .phases
        .get(step.phase)
        .and_then(|p| p.name.clone())
        .unwrap_or_else(|| format!("phase {}", step.phase));
    let faults = active_faults(report.faults);
    let battery = report.battery_command.to_string();
    let mut line = format!(
        "{:>6} ms  {:<12} {}  accel {:>7} mA  regen {:>7} mA  {:<9}",
        report.time_ms,
        phase,
        state_label(report.state),
        report.torque.accel_current,
        report.torque.regen_current,
        battery,
    );
    if report.aero == AeroPosition::Open {
        line.push_str(" aero");
    }
    if !faults.is_empty() {
        line.push_str(&format!(" {}", faults.join(", ").red()));
    }
    if let Some(t) = report.transition {
        let transition = format!("[{} -> {}: {}]", t.from, t.to, t.reason);
        line.push_str(&format!(" {}", transition.bold()));
    }
    println!("{line}");
}

/// Print a scenario replay, one line per control cycle
pub fn print_scenario_run(scenario: &Scenario, run: &ScenarioRun, json: bool) {
    if json {
        print_json(
            &json!({
                "success": true,
                "cycles": run.steps.len(),
                "steps": run.steps,
                "log": run.log
            }),
            "scenario run",
        );
        return;
    }

    for step in &run.steps {
        print_step(scenario, step);
    }

    let transitions = run
        .steps
        .iter()
        .filter(|s| s.report.transition.is_some())
        .count();
    let peak_accel = run
        .steps
        .iter()
        .map(|s| s.report.torque.accel_current)
        .max()
        .unwrap_or(0);
    let faulted_cycles = run.steps.iter().filter(|s| s.report.faults.any()).count();
    let final_state = run.steps.last().map(|s| s.report.state);

    println!();
    println!("{}", "Summary:".bold());
    println!("  Cycles: {}", run.steps.len());
    println!("  Transitions: {transitions}");
    println!("  Peak accel request: {peak_accel} mA");
    println!("  Cycles with pedal faults: {faulted_cycles}");
    if let Some(state) = final_state {
        println!("  Final state: {}", state_label(state));
    }
}
