//! Error types for pedal calibration and plausibility thresholds.

use thiserror::Error;

/// Errors raised when a pedal calibration or threshold set is rejected.
///
/// These only occur at construction time. The per-cycle checks report
/// faults as [`FaultFlags`](crate::FaultFlags), never as errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlausibilityError {
    /// A pedal calibration value is unusable.
    #[error("Invalid pedal calibration: {0}")]
    InvalidCalibration(String),

    /// A plausibility threshold is out of range.
    #[error("Invalid threshold '{name}': {reason}")]
    InvalidThreshold {
        /// Name of the threshold field.
        name: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

impl PlausibilityError {
    /// Create an invalid calibration error.
    #[must_use]
    pub fn invalid_calibration(reason: impl Into<String>) -> Self {
        Self::InvalidCalibration(reason.into())
    }

    /// Create an invalid threshold error.
    #[must_use]
    pub fn invalid_threshold(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidThreshold {
            name,
            reason: reason.into(),
        }
    }
}

/// A specialized `Result` type for plausibility configuration.
pub type PlausibilityResult<T> = Result<T, PlausibilityError>;
