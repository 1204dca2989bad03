//! Error types for building and configuring the drive controller.

use std::path::PathBuf;

use ecu_plausibility::PlausibilityError;
use ecu_torque::TorqueError;
use thiserror::Error;

/// Errors raised while loading configuration or constructing the controller.
///
/// A running control cycle never returns one of these.
#[derive(Debug, Error)]
pub enum EcuError {
    /// Pedal calibration or plausibility thresholds were rejected.
    #[error("Pedal configuration rejected: {0}")]
    Plausibility(#[from] PlausibilityError),

    /// Torque or cooling calibration was rejected.
    #[error("Calibration rejected: {0}")]
    Calibration(#[from] TorqueError),

    /// A controller-level setting is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The configuration file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration text is not valid JSON for [`EcuConfig`](crate::EcuConfig).
    #[error("Malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl EcuError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration(reason.into())
    }

    /// Create an I/O error tagged with the offending path.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// A specialized `Result` type for drive controller setup.
pub type EcuResult<T> = Result<T, EcuError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_wraps_lower_errors() {
        let err: EcuError = TorqueError::invalid_limit("duty_max must be non-zero").into();
        assert!(matches!(err, EcuError::Calibration(_)));
        assert!(err.to_string().contains("duty_max"));
    }

    #[test]
    fn test_io_error_names_path() {
        let err = EcuError::io(
            "/nonexistent/ecu.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.to_string().contains("/nonexistent/ecu.json"));
        assert!(err.source().is_some());
    }
}
