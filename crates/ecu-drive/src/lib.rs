//! Drive state machine and control cadence for the drive-train ECU.
//!
//! [`DriveController`] owns one of everything: the pedal plausibility
//! subsystem, the torque and cooling engines, the OFF/NEUTRAL/DRIVE state
//! machine, the switch latches and the collaborators behind the
//! [`ports`]. The caller supplies a monotonic clock and calls
//! [`DriveController::tick`] in a loop.
//!
//! # Safety behavior
//!
//! - Torque is only forwarded in DRIVE and only while no pedal fault is set.
//! - Battery or safety-circuit faults demote to OFF and command a shutdown.
//! - Re-entering NEUTRAL after a demotion needs a fresh traction switch edge.
//!
//! # Example
//!
//! ```rust
//! use core::time::Duration;
//! use ecu_drive::prelude::*;
//! use ecu_drive::sim::{ScriptedPedals, SimBus};
//!
//! let config = EcuConfig::default();
//! let pedals = ScriptedPedals::new(config.pedals.clone());
//! let mut ecu = DriveController::new(config, pedals, SimBus::live())?;
//!
//! ecu.switch_handle().set_traction_active(true);
//! let tick = ecu.tick(Duration::ZERO);
//! assert_eq!(ecu.state(), DriveState::Neutral);
//! assert!(tick.control.is_some_and(|r| r.torque.is_zero()));
//! # Ok::<(), EcuError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

pub mod aero;
pub mod config;
pub mod controller;
pub mod error;
pub mod fsm;
pub mod ports;
pub mod prelude;
pub mod sim;
pub mod state;
pub mod switches;

pub use aero::ActiveAero;
pub use config::{
    AeroConfig, DEFAULT_CONTROL_PERIOD_MS, DEFAULT_HOUSEKEEPING_PERIOD_MS, EcuConfig,
};
pub use controller::{Cadence, CycleReport, DriveController, HousekeepingReport, Tick};
pub use error::{EcuError, EcuResult};
pub use fsm::{DriveInputs, DriveStateMachine, Transition, TransitionReason};
pub use ports::{
    AeroActuator, BatteryPack, BatteryStatus, CalibrationLink, CoolingActuator, DriveBus,
    MotorController, MotorStatus, SafetyCircuit, Telemetry,
};
pub use state::{AeroPosition, BatteryCommand, BatteryState, DriveState};
pub use switches::{SwitchHandle, SwitchLatches, SwitchLevels, SwitchPanel};
