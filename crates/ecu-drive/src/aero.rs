//! Active aero flap decision.

use ecu_lut::scale;
use ecu_torque::TorqueRequest;

use crate::config::AeroConfig;
use crate::state::{AeroPosition, DriveState};

/// Opens the flaps under hard acceleration in DRIVE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveAero {
    open_threshold_ma: i32,
}

impl ActiveAero {
    /// Build from settings and the accel current limit.
    #[must_use]
    pub fn new(config: &AeroConfig, accel_max_ma: i32) -> Self {
        Self {
            open_threshold_ma: scale(config.open_accel_fraction, accel_max_ma),
        }
    }

    /// Accel current above which the flaps open.
    #[must_use]
    pub fn open_threshold_ma(&self) -> i32 {
        self.open_threshold_ma
    }

    /// Flap position for this cycle.
    #[must_use]
    pub fn position(
        &self,
        enabled: bool,
        state: DriveState,
        brake_pressed: bool,
        request: TorqueRequest,
    ) -> AeroPosition {
        let open = enabled
            && state == DriveState::Drive
            && !brake_pressed
            && request.accel_current > self.open_threshold_ma;
        if open {
            AeroPosition::Open
        } else {
            AeroPosition::Closed
        }
    }
}
