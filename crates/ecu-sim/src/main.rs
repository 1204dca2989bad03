//! ecu-sim - Drive-train ECU host simulator
//!
//! Checks controller configuration files, replays timed input scenarios
//! against the drive controller and evaluates the reference calibration.

#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod error;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::TableName;
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "ecu-sim")]
#[command(about = "Drive-train ECU simulator - check configurations and replay scenarios")]
#[command(version)]
#[command(long_about = "
ecu-sim runs the drive-train ECU control core on the host. It validates
controller configuration files, replays scripted pedal, switch and
battery inputs at the configured control cadence, and evaluates the
reference calibration tables.

Use --json for machine-readable output suitable for scripting.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate a controller configuration file
    CheckConfig {
        /// Path to the JSON configuration
        path: PathBuf,
    },

    /// Replay a scenario and print one line per control cycle
    Run {
        /// Path to the JSON scenario
        scenario: PathBuf,
        /// Controller configuration; defaults apply when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Evaluate a reference calibration table
    Table {
        /// Table to evaluate
        #[arg(value_enum)]
        name: TableName,
        /// Lookup key (°C, rpm or canonical throttle units)
        #[arg(allow_negative_numbers = true)]
        key: i32,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_log_filter(log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match execute_command(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }
            let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(code)
        }
    }
}

/// Crates whose events the simulator shows without `RUST_LOG`.
const LOG_TARGETS: [&str; 5] = [
    "ecu_sim",
    "ecu_drive",
    "ecu_plausibility",
    "ecu_torque",
    "ecu_lut",
];

fn default_log_filter(level: &str) -> String {
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::CheckConfig { path } => commands::config::execute(path, cli.json),
        Commands::Run { scenario, config } => {
            commands::run::execute(scenario, config.as_deref(), cli.json)
        }
        Commands::Table { name, key } => commands::table::execute(*name, *key, cli.json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn parse_check_config() -> TestResult {
        let cli = Cli::try_parse_from(["ecu-sim", "check-config", "ecu.json"])?;
        assert!(!cli.json);
        assert_eq!(cli.verbose, 0);
        assert!(matches!(
            cli.command,
            Commands::CheckConfig { ref path } if path == &PathBuf::from("ecu.json")
        ));
        Ok(())
    }

    #[test]
    fn parse_run_with_config_and_global_flags() -> TestResult {
        let cli = Cli::try_parse_from([
            "ecu-sim",
            "-vv",
            "run",
            "launch.json",
            "--config",
            "ecu.json",
            "--json",
        ])?;
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Run { scenario, config } => {
                assert_eq!(scenario, PathBuf::from("launch.json"));
                assert_eq!(config, Some(PathBuf::from("ecu.json")));
            }
            _ => return Err("expected run command".into()),
        }
        Ok(())
    }

    #[test]
    fn parse_run_without_config() -> TestResult {
        let cli = Cli::try_parse_from(["ecu-sim", "run", "launch.json"])?;
        assert!(matches!(cli.command, Commands::Run { config: None, .. }));
        Ok(())
    }

    #[test]
    fn parse_table_with_negative_key() -> TestResult {
        let cli = Cli::try_parse_from(["ecu-sim", "table", "coolant-fan", "-20"])?;
        assert!(matches!(
            cli.command,
            Commands::Table {
                name: TableName::CoolantFan,
                key: -20
            }
        ));
        Ok(())
    }

    #[test]
    fn rejects_unknown_table() {
        let result = Cli::try_parse_from(["ecu-sim", "table", "turbo-boost", "10"]);
        assert!(matches!(result, Err(ref e) if e.kind() == clap::error::ErrorKind::InvalidValue));
    }

    #[test]
    fn default_filter_covers_every_control_crate() -> TestResult {
        let filter = default_log_filter("info");
        for target in ["ecu_plausibility", "ecu_torque", "ecu_drive", "ecu_sim"] {
            let directive = format!("{target}=info");
            assert!(filter.split(',').any(|d| d == directive), "{filter}");
        }
        tracing_subscriber::EnvFilter::try_new(&filter)?;
        Ok(())
    }

    #[test]
    fn requires_a_subcommand() {
        assert!(matches!(Cli::try_parse_from(["ecu-sim"]), Err(_)));
    }
}
