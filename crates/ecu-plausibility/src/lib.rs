//! Pedal plausibility and fault detection for the drive-train ECU.
//!
//! This crate decides whether the driver inputs can be trusted. It runs four
//! independent checks every control cycle and exposes one aggregate
//! "implausibility present" flag that the drive state machine uses to
//! suppress torque.
//!
//! # Checks
//!
//! | Fault | Condition | Confirmation |
//! |---|---|---|
//! | APPS disagreement | sensors differ by more than 10 points | 100 ms debounce |
//! | APPS out of range | either raw reading outside the electrical window | 100 ms debounce |
//! | Brake circuit | hardware valid line low | 100 ms debounce |
//! | BPPC | both brakes pressed and throttle above 25 % | immediate, latched until throttle < 5 % |
//!
//! # RT Safety
//!
//! Construction validates the calibration and may allocate for error
//! messages. The per-cycle methods never allocate.
//!
//! # Example
//!
//! ```rust
//! use core::time::Duration;
//! use ecu_plausibility::prelude::*;
//!
//! let mut pedals = PedalPlausibility::new(
//!     PedalCalibration::default(),
//!     PlausibilityThresholds::default(),
//! )?;
//!
//! let mut sensors = RawPedalSample {
//!     apps1: 2050,
//!     apps2: 2050,
//!     front_brake: 400,
//!     rear_brake: 400,
//!     brake_circuit_valid: true,
//! };
//!
//! pedals.update_sensor_values(&mut sensors);
//! pedals.check_for_implausibilities(Duration::ZERO);
//! assert!(!pedals.is_implausibility_present());
//! assert_eq!(pedals.get_throttle(), 1023);
//! # Ok::<(), PlausibilityError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

mod debounce;
mod error;
mod faults;
mod pedals;
mod plausibility;

pub mod prelude;

pub use debounce::{DebounceState, DebounceTimer};
pub use error::{PlausibilityError, PlausibilityResult};
pub use faults::{
    DEFAULT_BPPC_REARM_FRACTION, DEFAULT_BPPC_TRIP_FRACTION, FaultFlags, PedalFault,
    PlausibilityThresholds,
};
pub use pedals::{
    ADC_FULL_SCALE, AdcSpan, DEFAULT_CANONICAL_MAX, PedalCalibration, PedalReading,
    PedalReadings, PedalSensors, RawPedalSample, ValidityWindow,
};
pub use plausibility::{PedalPlausibility, PedalStatus};

#[cfg(test)]
mod tests;
