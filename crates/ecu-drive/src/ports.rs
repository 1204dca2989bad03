//! Port traits for the collaborators around the control core.
//!
//! The CAN layer, the dashboard and the actuator drivers sit behind these
//! traits. The controller only ever sees logical fields; framing and signal
//! packing belong to the implementations.
//!
//! Every method is called from the control thread and must return without
//! blocking.

use ecu_plausibility::PedalStatus;
use ecu_torque::{AccelTableUpdate, CoolingDuty, TempLimiting, TorqueRequest};
use serde::{Deserialize, Serialize};

use crate::state::{AeroPosition, BatteryCommand, BatteryState, DriveState};

/// Latest battery pack report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatteryStatus {
    /// Reported operating state.
    pub state: BatteryState,
    /// Pack fault flag, independent of `state`.
    pub faulted: bool,
    /// Pack temperature in °C.
    pub temperature_c: i16,
}

impl BatteryStatus {
    /// True if the pack reports a fault by either channel.
    #[must_use]
    pub fn is_faulted(&self) -> bool {
        self.faulted || self.state == BatteryState::Fault
    }

    /// True if the contactors are closed and the pack is healthy.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == BatteryState::Active && !self.faulted
    }
}

/// Latest motor controller report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MotorStatus {
    /// Motor speed in rpm.
    pub speed_rpm: i32,
    /// Inverter IGBT temperature in °C.
    pub igbt_temp_c: i16,
    /// Motor winding temperature in °C.
    pub motor_temp_c: i16,
}

/// Battery management system.
pub trait BatteryPack {
    /// Most recent status report.
    fn battery_status(&self) -> BatteryStatus;

    /// Send a contactor command.
    fn command_battery(&mut self, command: BatteryCommand);
}

/// Motor inverter.
pub trait MotorController {
    /// Most recent status report.
    fn motor_status(&self) -> MotorStatus;

    /// Send a current request.
    fn request_torque(&mut self, request: TorqueRequest);
}

/// Shutdown circuit monitor.
pub trait SafetyCircuit {
    /// True while the safety circuit reports a fault.
    fn safety_fault_present(&self) -> bool;
}

/// Pump and fan driver, typically a power-distribution module.
pub trait CoolingActuator {
    /// Coolant temperature in °C.
    fn coolant_temperature_c(&self) -> f32;

    /// Publish new duty bytes.
    fn set_cooling_duty(&mut self, duty: CoolingDuty);
}

/// Active aero flap driver.
pub trait AeroActuator {
    /// True if the driver has enabled active aero.
    fn aero_enabled(&self) -> bool;

    /// Command a flap position.
    fn command_aero(&mut self, position: AeroPosition);
}

/// Source of run-time accel table replacements.
pub trait CalibrationLink {
    /// Take the next pending update, if any.
    fn poll_accel_update(&mut self) -> Option<AccelTableUpdate>;

    /// Report the outcome of the last update: its `lut_id`, or `0` on rejection.
    fn respond_accel_update(&mut self, response: u8);
}

/// Telemetry sink.
pub trait Telemetry {
    /// Publish the current drive state.
    fn publish_drive_state(&mut self, state: DriveState);

    /// Publish pedal readings and fault flags.
    fn publish_pedal_status(&mut self, status: PedalStatus);

    /// Publish which components are limiting torque.
    fn publish_temp_limiting(&mut self, limiting: TempLimiting);
}

/// Everything the controller talks to besides the pedal sensors.
///
/// Implemented automatically for any type providing every port.
pub trait DriveBus:
    BatteryPack
    + MotorController
    + SafetyCircuit
    + CoolingActuator
    + AeroActuator
    + CalibrationLink
    + Telemetry
{
}

impl<T> DriveBus for T where
    T: BatteryPack
        + MotorController
        + SafetyCircuit
        + CoolingActuator
        + AeroActuator
        + CalibrationLink
        + Telemetry
{
}
