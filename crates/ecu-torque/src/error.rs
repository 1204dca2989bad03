//! Error types for torque and cooling calibration.

use ecu_lut::LutError;
use thiserror::Error;

/// Errors raised while building the torque or cooling engines.
///
/// Only construction and calibration replacement can fail. Computing a
/// torque request or a duty cycle never does.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TorqueError {
    /// A calibration table failed validation.
    #[error("Invalid {table} table: {source}")]
    Table {
        /// Which table was rejected.
        table: &'static str,
        /// Underlying table error.
        source: LutError,
    },

    /// A current or duty limit is unusable.
    #[error("Invalid limit: {0}")]
    InvalidLimit(String),

    /// A calibration link reported a status code outside the known set.
    #[error("Unknown calibration file status: {0}")]
    UnknownFileStatus(u8),
}

impl TorqueError {
    /// Attach a table name to a [`LutError`].
    #[must_use]
    pub fn table(table: &'static str, source: LutError) -> Self {
        Self::Table { table, source }
    }

    /// Create an invalid limit error.
    #[must_use]
    pub fn invalid_limit(reason: impl Into<String>) -> Self {
        Self::InvalidLimit(reason.into())
    }
}

/// A specialized `Result` type for torque and cooling operations.
pub type TorqueResult<T> = Result<T, TorqueError>;
