//! OFF / NEUTRAL / DRIVE state machine.
//!
//! | From | To | When |
//! |---|---|---|
//! | NEUTRAL, DRIVE | OFF | traction latch off, battery fault or safety-circuit fault |
//! | DRIVE | NEUTRAL | ready-to-drive latch off |
//! | OFF | NEUTRAL | traction latch on, battery active, no safety-circuit fault |
//! | NEUTRAL | DRIVE | ready-to-drive latch on, no safety-circuit fault |
//!
//! Rows are checked top to bottom and at most one transition happens per
//! step. Demotion to OFF always wins.

use core::fmt;

use serde::Serialize;

use crate::state::DriveState;

/// Inputs sampled for one state machine step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DriveInputs {
    /// Traction-system-active latch.
    pub traction_active: bool,
    /// Ready-to-drive latch.
    pub ready_to_drive: bool,
    /// Battery pack reports active and healthy.
    pub battery_active: bool,
    /// Battery pack reports a fault.
    pub battery_fault: bool,
    /// Safety circuit reports a fault.
    pub safety_fault: bool,
}

/// Why a transition happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionReason {
    /// Traction switch latched with a live pack.
    TractionActivated,
    /// Ready-to-drive latched.
    ReadyToDrive,
    /// Ready-to-drive released.
    ReadyToDriveReleased,
    /// Traction switch turned off.
    TractionDeactivated,
    /// Battery pack fault.
    BatteryFault,
    /// Safety circuit fault.
    SafetyCircuitFault,
}

impl TransitionReason {
    /// True for demotions forced by an upstream device.
    #[must_use]
    pub fn is_upstream_fault(self) -> bool {
        matches!(self, Self::BatteryFault | Self::SafetyCircuitFault)
    }
}

impl fmt::Display for TransitionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::TractionActivated => "traction activated",
            Self::ReadyToDrive => "ready to drive",
            Self::ReadyToDriveReleased => "ready to drive released",
            Self::TractionDeactivated => "traction deactivated",
            Self::BatteryFault => "battery fault",
            Self::SafetyCircuitFault => "safety circuit fault",
        };
        f.write_str(text)
    }
}

/// A state change and its cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    /// State before the step.
    pub from: DriveState,
    /// State after the step.
    pub to: DriveState,
    /// Cause.
    pub reason: TransitionReason,
}

/// The drive state machine. Starts in OFF.
#[derive(Debug, Clone, Default)]
pub struct DriveStateMachine {
    state: DriveState,
}

impl DriveStateMachine {
    /// New state machine in OFF.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> DriveState {
        self.state
    }

    /// Evaluate the transition table once.
    pub fn step(&mut self, inputs: &DriveInputs) -> Option<Transition> {
        let (to, reason) = Self::next(self.state, inputs)?;
        let transition = Transition {
            from: self.state,
            to,
            reason,
        };
        self.state = to;

        if reason.is_upstream_fault() {
            tracing::warn!(from = %transition.from, to = %to, reason = %reason, "Drive state demoted");
        } else {
            tracing::info!(from = %transition.from, to = %to, reason = %reason, "Drive state changed");
        }
        Some(transition)
    }

    fn next(state: DriveState, inputs: &DriveInputs) -> Option<(DriveState, TransitionReason)> {
        use DriveState::{Drive, Neutral, Off};

        if state != Off {
            if !inputs.traction_active {
                return Some((Off, TransitionReason::TractionDeactivated));
            }
            if inputs.battery_fault {
                return Some((Off, TransitionReason::BatteryFault));
            }
            if inputs.safety_fault {
                return Some((Off, TransitionReason::SafetyCircuitFault));
            }
        }

        match state {
            Drive if !inputs.ready_to_drive => {
                Some((Neutral, TransitionReason::ReadyToDriveReleased))
            }
            Off if inputs.traction_active && inputs.battery_active && !inputs.safety_fault => {
                Some((Neutral, TransitionReason::TractionActivated))
            }
            Neutral if inputs.ready_to_drive && !inputs.safety_fault => {
                Some((Drive, TransitionReason::ReadyToDrive))
            }
            _ => None,
        }
    }
}
