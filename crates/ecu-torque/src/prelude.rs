//! Prelude for convenient imports.
//!
//! ```rust
//! use ecu_torque::prelude::*;
//! ```

pub use crate::{
    AccelTableUpdate, CalibrationSet, ComponentTemps, CoolingDuty, CoolingEngine, CoolingInputs,
    CoolingTables, CurrentLimits, DEFAULT_CURRENT_LIMIT_MA, DUTY_MAX, FileStatus, TempLimiting,
    ThermalDerate, TorqueEngine, TorqueError, TorqueInputs, TorqueModifiers, TorqueRequest,
    TorqueResult, TorqueTables,
};
