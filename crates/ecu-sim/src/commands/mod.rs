//! Command implementations for the ecu-sim CLI

pub mod config;
pub mod run;
pub mod table;

use clap::ValueEnum;

/// Reference calibration tables addressable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TableName {
    /// IGBT temperature (°C) to torque derate
    IgbtDerate,
    /// Battery temperature (°C) to torque derate
    BatteryDerate,
    /// Motor temperature (°C) to torque derate
    MotorDerate,
    /// Motor speed (rpm) to zero-torque throttle
    SpeedBaseline,
    /// Throttle delta to acceleration fraction
    Accel,
    /// Throttle delta magnitude to regeneration fraction
    Regen,
    /// Motor temperature (°C) to pump duty
    MotorPump,
    /// IGBT temperature (°C) to pump duty
    IgbtPump,
    /// Battery temperature (°C) to pump duty
    BatteryPump,
    /// Coolant temperature (°C) to fan duty
    CoolantFan,
}
