//! Prelude for convenient imports.
//!
//! Re-exports the controller, its configuration and the port traits, plus
//! the pedal and torque types that cross the port boundary.
//!
//! ```rust
//! use ecu_drive::prelude::*;
//! ```

pub use crate::{
    AeroActuator, AeroPosition, BatteryCommand, BatteryPack, BatteryState, BatteryStatus,
    CalibrationLink, CoolingActuator, CycleReport, DriveBus, DriveController, DriveState,
    EcuConfig, EcuError, EcuResult, HousekeepingReport, MotorController, MotorStatus,
    SafetyCircuit, SwitchHandle, Telemetry, Tick, Transition, TransitionReason,
};

pub use ecu_plausibility::{FaultFlags, PedalFault, PedalSensors, PedalStatus, RawPedalSample};
pub use ecu_torque::{
    AccelTableUpdate, CoolingDuty, FileStatus, TempLimiting, TorqueRequest,
};
