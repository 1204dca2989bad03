//! Torque requests, thermal derating and cooling duty for the drive-train ECU.
//!
//! Both engines in this crate are thin, table-driven layers over
//! [`ecu_lut`]. They own their calibration curves by value, validate them on
//! construction and never fail afterwards.
//!
//! # Torque
//!
//! [`TorqueEngine`] compares the throttle against a speed-dependent
//! baseline, maps the difference through the accel or regen curve, multiplies
//! by the [`ThermalDerate`] product and scales to the inverter current limits.
//!
//! # Cooling
//!
//! [`CoolingEngine`] drives the coolant pump from the hottest of three
//! component curves and the radiator fan from coolant temperature.
//!
//! # Example
//!
//! ```rust
//! use ecu_torque::prelude::*;
//!
//! let engine = TorqueEngine::reference(2047)?;
//! let request = engine.compute(&TorqueInputs {
//!     throttle: 0,
//!     speed_rpm: 0,
//!     brake_pressed: false,
//!     temps: ComponentTemps::new(0, 0, 0),
//! });
//! assert!(request.is_zero());
//!
//! let cooling = CoolingEngine::reference()?;
//! assert_eq!(cooling.fan_duty(60.0), 255);
//! # Ok::<(), TorqueError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

pub mod cooling;
pub mod derate;
pub mod error;
pub mod prelude;
pub mod tables;
pub mod torque;
pub mod update;

pub use cooling::{CoolingDuty, CoolingEngine, CoolingInputs, DUTY_MAX};
pub use derate::{ComponentTemps, TempLimiting, ThermalDerate};
pub use error::{TorqueError, TorqueResult};
pub use tables::{CalibrationSet, CoolingTables, TorqueTables, validate_accel_table};
pub use torque::{
    CurrentLimits, DEFAULT_CURRENT_LIMIT_MA, TorqueEngine, TorqueInputs, TorqueModifiers,
    TorqueRequest,
};
pub use update::{AccelTableUpdate, FileStatus};
