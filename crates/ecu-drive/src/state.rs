//! Drive, battery and actuator state values exchanged with collaborators.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Vehicle drive state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum DriveState {
    /// Tractive system off. Initial state.
    #[default]
    Off = 0,
    /// Tractive system energized, torque held at zero.
    Neutral = 1,
    /// Torque requests are forwarded to the inverter.
    Drive = 2,
}

impl DriveState {
    /// True only in [`DriveState::Drive`].
    #[must_use]
    pub fn allows_torque(self) -> bool {
        matches!(self, Self::Drive)
    }
}

impl fmt::Display for DriveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "OFF"),
            Self::Neutral => write!(f, "NEUTRAL"),
            Self::Drive => write!(f, "DRIVE"),
        }
    }
}

/// Operating state reported by the battery pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BatteryState {
    /// Contactors open.
    #[default]
    Shutdown = 0,
    /// Precharge in progress.
    Precharge = 1,
    /// Contactors closed, tractive system live.
    Active = 2,
    /// Charging.
    Charging = 3,
    /// Pack fault.
    Fault = 4,
}

impl TryFrom<u8> for BatteryState {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Shutdown),
            1 => Ok(Self::Precharge),
            2 => Ok(Self::Active),
            3 => Ok(Self::Charging),
            4 => Ok(Self::Fault),
            other => Err(other),
        }
    }
}

/// Command sent to the battery pack every control cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BatteryCommand {
    /// Precharge, then close and hold the contactors.
    PrechargeAndCloseContactors = 1,
    /// Open the contactors.
    Shutdown = 2,
}

impl fmt::Display for BatteryCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrechargeAndCloseContactors => write!(f, "precharge"),
            Self::Shutdown => write!(f, "shutdown"),
        }
    }
}

/// Active aero flap position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AeroPosition {
    /// Flaps closed, full downforce.
    #[default]
    Closed,
    /// Flaps open, reduced drag.
    Open,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_drive_allows_torque() {
        assert!(!DriveState::Off.allows_torque());
        assert!(!DriveState::Neutral.allows_torque());
        assert!(DriveState::Drive.allows_torque());
    }

    #[test]
    fn test_battery_state_codes() {
        for code in 0u8..=4 {
            assert_eq!(BatteryState::try_from(code).map(|s| s as u8), Ok(code));
        }
        assert_eq!(BatteryState::try_from(9), Err(9));
    }

    #[test]
    fn test_wire_values() {
        assert_eq!(BatteryCommand::PrechargeAndCloseContactors as u8, 1);
        assert_eq!(BatteryCommand::Shutdown as u8, 2);
        assert_eq!(DriveState::Drive as u8, 2);
        assert_eq!(DriveState::Neutral.to_string(), "NEUTRAL");
    }
}
