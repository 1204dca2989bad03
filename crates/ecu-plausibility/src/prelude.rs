//! Prelude for convenient imports.
//!
//! This module re-exports the most commonly used types and traits.
//!
//! # Example
//!
//! ```rust
//! use ecu_plausibility::prelude::*;
//! ```

pub use crate::{
    AdcSpan, DebounceState, DebounceTimer, FaultFlags, PedalCalibration, PedalFault,
    PedalPlausibility, PedalReadings, PedalSensors, PedalStatus, PlausibilityError,
    PlausibilityResult, PlausibilityThresholds, RawPedalSample, ValidityWindow,
};
