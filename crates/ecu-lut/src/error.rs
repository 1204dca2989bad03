//! Error types for lookup table construction and validation.

use thiserror::Error;

/// Direction a calibration curve is required to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Monotonicity {
    /// Each value is greater than or equal to the previous one.
    NonDecreasing,
    /// Each value is less than or equal to the previous one.
    NonIncreasing,
}

impl core::fmt::Display for Monotonicity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NonDecreasing => write!(f, "non-decreasing"),
            Self::NonIncreasing => write!(f, "non-increasing"),
        }
    }
}

/// Errors raised while building or validating a [`LookupTable`](crate::LookupTable).
///
/// Every variant describes malformed calibration data. None of them can be
/// produced by [`LookupTable::lookup`](crate::LookupTable::lookup), which is
/// infallible once a table exists.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LutError {
    /// The table has no entries.
    #[error("lookup table is empty")]
    Empty,

    /// A key is not strictly greater than the key before it.
    #[error("key {key} at index {index} does not follow previous key {previous}")]
    KeysNotIncreasing {
        /// Position of the offending entry.
        index: usize,
        /// Key of the entry before it.
        previous: i32,
        /// The offending key.
        key: i32,
    },

    /// A value is NaN or infinite.
    #[error("value at key {key} is not finite")]
    NonFiniteValue {
        /// Key of the offending entry.
        key: i32,
    },

    /// A value lies outside the range the caller requires.
    #[error("value {value} at key {key} is outside [{min}, {max}]")]
    ValueOutOfRange {
        /// Key of the offending entry.
        key: i32,
        /// The offending value.
        value: f32,
        /// Inclusive lower bound.
        min: f32,
        /// Inclusive upper bound.
        max: f32,
    },

    /// The curve changes direction at `key`.
    #[error("curve must be {expected} but changes direction at key {key}")]
    NotMonotonic {
        /// Required direction.
        expected: Monotonicity,
        /// First key where the requirement is broken.
        key: i32,
    },
}

/// Result alias for lookup table operations.
pub type LutResult<T> = Result<T, LutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_key() {
        let err = LutError::KeysNotIncreasing {
            index: 3,
            previous: 20,
            key: 20,
        };
        let msg = err.to_string();
        assert!(msg.contains("key 20 at index 3"));
        assert!(msg.contains("previous key 20"));
    }

    #[test]
    fn display_monotonic_direction() {
        let err = LutError::NotMonotonic {
            expected: Monotonicity::NonIncreasing,
            key: 110,
        };
        assert_eq!(
            err.to_string(),
            "curve must be non-increasing but changes direction at key 110"
        );
    }

    #[test]
    fn error_is_std_error() {
        let err = LutError::Empty;
        let _: &dyn std::error::Error = &err;
    }
}
