//! Pedal fault types, flag sets and detection thresholds.

use core::fmt;
use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PlausibilityError, PlausibilityResult};

/// Default BPPC re-arm point as a fraction of full throttle.
pub const DEFAULT_BPPC_REARM_FRACTION: f32 = 0.05;

/// Default BPPC trip point as a fraction of full throttle.
pub const DEFAULT_BPPC_TRIP_FRACTION: f32 = 0.25;

/// Pedal faults the plausibility subsystem can raise.
///
/// Every fault suppresses torque while active. None of them demotes the
/// drive state; that is reserved for upstream-device faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PedalFault {
    /// The two accelerator sensors disagree by more than the allowed margin.
    AppsDisagreement,
    /// Brakes pressed while the accelerator is well open.
    BrakePedalPositionConflict,
    /// An accelerator sensor reads outside its electrical window (open or shorted).
    AppsOutOfRange,
    /// The brake sensor circuit reports open or shorted.
    BrakeCircuit,
}

impl PedalFault {
    /// Every fault, in telemetry bit order.
    pub const ALL: [PedalFault; 4] = [
        PedalFault::AppsDisagreement,
        PedalFault::BrakePedalPositionConflict,
        PedalFault::AppsOutOfRange,
        PedalFault::BrakeCircuit,
    ];

    /// Bit used for this fault in [`FaultFlags::bits`].
    #[must_use]
    pub const fn bit(self) -> u8 {
        match self {
            PedalFault::AppsDisagreement => 1 << 0,
            PedalFault::BrakePedalPositionConflict => 1 << 1,
            PedalFault::AppsOutOfRange => 1 << 2,
            PedalFault::BrakeCircuit => 1 << 3,
        }
    }

    /// True if the fault clears on its own once the sensors read sanely.
    ///
    /// BPPC is latched and only clears when the driver lifts off the
    /// accelerator.
    #[must_use]
    pub const fn is_self_clearing(self) -> bool {
        !matches!(self, PedalFault::BrakePedalPositionConflict)
    }
}

impl fmt::Display for PedalFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PedalFault::AppsDisagreement => write!(f, "APPS disagreement"),
            PedalFault::BrakePedalPositionConflict => write!(f, "Brake pedal position conflict"),
            PedalFault::AppsOutOfRange => write!(f, "APPS out of range"),
            PedalFault::BrakeCircuit => write!(f, "Brake circuit open or shorted"),
        }
    }
}

/// Current state of the four pedal fault flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FaultFlags {
    /// APPS channels disagree (debounced).
    pub apps_disagreement: bool,
    /// Brake pedal position conflict (latched).
    pub bppc: bool,
    /// APPS outside electrical window (debounced).
    pub apps_out_of_range: bool,
    /// Brake circuit invalid (debounced).
    pub brake_circuit: bool,
}

impl FaultFlags {
    /// No faults.
    pub const CLEAR: Self = Self {
        apps_disagreement: false,
        bppc: false,
        apps_out_of_range: false,
        brake_circuit: false,
    };

    /// True if any flag is set.
    #[must_use]
    pub fn any(&self) -> bool {
        self.apps_disagreement || self.bppc || self.apps_out_of_range || self.brake_circuit
    }

    /// State of one fault.
    #[must_use]
    pub fn is_set(&self, fault: PedalFault) -> bool {
        match fault {
            PedalFault::AppsDisagreement => self.apps_disagreement,
            PedalFault::BrakePedalPositionConflict => self.bppc,
            PedalFault::AppsOutOfRange => self.apps_out_of_range,
            PedalFault::BrakeCircuit => self.brake_circuit,
        }
    }

    /// Packed telemetry representation, one bit per [`PedalFault::bit`].
    #[must_use]
    pub fn bits(&self) -> u8 {
        PedalFault::ALL
            .iter()
            .filter(|fault| self.is_set(**fault))
            .fold(0, |acc, fault| acc | fault.bit())
    }

    /// Iterate over the active faults.
    pub fn active(&self) -> impl Iterator<Item = PedalFault> + '_ {
        PedalFault::ALL.into_iter().filter(|fault| self.is_set(*fault))
    }
}

/// Detection thresholds for the pedal checks.
///
/// Debounce windows are in milliseconds so the struct reads naturally from
/// configuration files. BPPC points are fractions of the canonical throttle
/// range and are converted with [`ecu_lut::scale`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlausibilityThresholds {
    /// Maximum APPS disagreement in percentage points.
    pub apps_disagreement_points: f32,
    /// How long the APPS disagreement must persist.
    pub apps_disagreement_window_ms: u64,
    /// How long an APPS range violation must persist.
    pub apps_range_window_ms: u64,
    /// How long a brake circuit fault must persist.
    pub brake_circuit_window_ms: u64,
    /// Throttle fraction above which braking trips BPPC.
    pub bppc_trip_fraction: f32,
    /// Throttle fraction below which a latched BPPC clears.
    pub bppc_rearm_fraction: f32,
}

impl Default for PlausibilityThresholds {
    fn default() -> Self {
        Self {
            apps_disagreement_points: 10.0,
            apps_disagreement_window_ms: 100,
            apps_range_window_ms: 100,
            brake_circuit_window_ms: 100,
            bppc_trip_fraction: DEFAULT_BPPC_TRIP_FRACTION,
            bppc_rearm_fraction: DEFAULT_BPPC_REARM_FRACTION,
        }
    }
}

impl PlausibilityThresholds {
    /// APPS disagreement debounce window.
    #[must_use]
    pub fn apps_disagreement_window(&self) -> Duration {
        Duration::from_millis(self.apps_disagreement_window_ms)
    }

    /// APPS range debounce window.
    #[must_use]
    pub fn apps_range_window(&self) -> Duration {
        Duration::from_millis(self.apps_range_window_ms)
    }

    /// Brake circuit debounce window.
    #[must_use]
    pub fn brake_circuit_window(&self) -> Duration {
        Duration::from_millis(self.brake_circuit_window_ms)
    }

    /// Set the APPS disagreement margin.
    #[must_use]
    pub fn with_disagreement_points(mut self, points: f32) -> Self {
        self.apps_disagreement_points = points;
        self
    }

    /// Set all three debounce windows to the same value.
    #[must_use]
    pub fn with_debounce_ms(mut self, window_ms: u64) -> Self {
        self.apps_disagreement_window_ms = window_ms;
        self.apps_range_window_ms = window_ms;
        self.brake_circuit_window_ms = window_ms;
        self
    }

    /// Set the BPPC trip and re-arm fractions.
    #[must_use]
    pub fn with_bppc(mut self, trip_fraction: f32, rearm_fraction: f32) -> Self {
        self.bppc_trip_fraction = trip_fraction;
        self.bppc_rearm_fraction = rearm_fraction;
        self
    }

    /// Validate the thresholds.
    ///
    /// # Errors
    ///
    /// Returns [`PlausibilityError::InvalidThreshold`] naming the first bad field.
    pub fn validate(&self) -> PlausibilityResult<()> {
        if !(self.apps_disagreement_points > 0.0 && self.apps_disagreement_points <= 100.0) {
            return Err(PlausibilityError::invalid_threshold(
                "apps_disagreement_points",
                "must be in (0, 100]",
            ));
        }
        if !(self.bppc_trip_fraction > 0.0 && self.bppc_trip_fraction <= 1.0) {
            return Err(PlausibilityError::invalid_threshold(
                "bppc_trip_fraction",
                "must be in (0, 1]",
            ));
        }
        if !(self.bppc_rearm_fraction >= 0.0 && self.bppc_rearm_fraction < self.bppc_trip_fraction)
        {
            return Err(PlausibilityError::invalid_threshold(
                "bppc_rearm_fraction",
                "must be non-negative and below bppc_trip_fraction",
            ));
        }
        Ok(())
    }
}
