//! Error types for the ecu-sim CLI

use ecu_drive::EcuError;
use ecu_lut::LutError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[source] EcuError),

    #[error("Scenario error: {0}")]
    Scenario(#[source] EcuError),

    #[error("Calibration table error: {0}")]
    Table(#[from] LutError),
}

impl CliError {
    /// Short name used in JSON error output.
    pub fn kind(&self) -> &'static str {
        match self {
            CliError::InvalidConfiguration(_) => "InvalidConfiguration",
            CliError::Scenario(_) => "Scenario",
            CliError::Table(_) => "Table",
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Scenario(EcuError::Io { .. })
            | CliError::InvalidConfiguration(EcuError::Io { .. }) => 2,
            CliError::Scenario(_) => 3,
            CliError::InvalidConfiguration(_) | CliError::Table(_) => 4,
        }
    }
}
