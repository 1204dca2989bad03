//! Dashboard switches.
//!
//! Edge handlers run outside the control cycle. They only store the latest
//! observed level through a [`SwitchHandle`]; the control cycle reads the
//! levels once at its start and turns them into latches.
//!
//! # Thread Safety
//!
//! Levels are plain `AtomicBool`s with `Ordering::Relaxed`. Each switch is
//! independent and the control cycle tolerates reading a level one cycle late.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use crate::state::DriveState;

#[derive(Debug, Default)]
struct SwitchCells {
    traction_active: AtomicBool,
    ready_to_drive: AtomicBool,
}

/// Owner side of the switch levels, read by the control cycle.
#[derive(Debug, Default)]
pub struct SwitchPanel {
    cells: Arc<SwitchCells>,
}

/// Writer side of the switch levels, handed to edge handlers.
#[derive(Debug, Clone)]
pub struct SwitchHandle {
    cells: Arc<SwitchCells>,
}

/// Switch levels sampled at the start of a control cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SwitchLevels {
    /// Traction-system-active switch is on.
    pub traction_active: bool,
    /// Ready-to-drive switch is on.
    pub ready_to_drive: bool,
}

impl SwitchPanel {
    /// Create a panel with both switches off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle for an edge handler.
    #[must_use]
    pub fn handle(&self) -> SwitchHandle {
        SwitchHandle {
            cells: Arc::clone(&self.cells),
        }
    }

    /// Sample both levels.
    #[must_use]
    pub fn levels(&self) -> SwitchLevels {
        SwitchLevels {
            traction_active: self.cells.traction_active.load(Ordering::Relaxed),
            ready_to_drive: self.cells.ready_to_drive.load(Ordering::Relaxed),
        }
    }
}

impl SwitchHandle {
    /// Record the traction-system-active switch level.
    pub fn set_traction_active(&self, on: bool) {
        self.cells.traction_active.store(on, Ordering::Relaxed);
    }

    /// Record the ready-to-drive switch level.
    pub fn set_ready_to_drive(&self, on: bool) {
        self.cells.ready_to_drive.store(on, Ordering::Relaxed);
    }
}

/// Latches derived from switch edges.
///
/// A latch needs a fresh rising edge to set, so a switch left on through a
/// shutdown has to be cycled before the car can be re-energized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SwitchLatches {
    traction_active: bool,
    ready_to_drive: bool,
    previous: SwitchLevels,
}

impl SwitchLatches {
    /// Both latches clear, both previous levels low.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one sample of switch levels into the latches.
    ///
    /// Ready-to-drive only latches on a rising edge seen while the brake is
    /// held and the car is in [`DriveState::Neutral`].
    pub fn update(&mut self, levels: SwitchLevels, brake_pressed: bool, state: DriveState) {
        let traction_rise = levels.traction_active && !self.previous.traction_active;
        let ready_rise = levels.ready_to_drive && !self.previous.ready_to_drive;

        if !levels.traction_active {
            self.traction_active = false;
        } else if traction_rise {
            self.traction_active = true;
        }

        if !levels.ready_to_drive {
            self.ready_to_drive = false;
        } else if ready_rise && brake_pressed && state == DriveState::Neutral {
            self.ready_to_drive = true;
        }

        self.previous = levels;
    }

    /// Drop both latches. Called on every demotion to OFF.
    pub fn drop_all(&mut self) {
        self.traction_active = false;
        self.ready_to_drive = false;
    }

    /// Traction-system-active latch.
    #[must_use]
    pub fn traction_active(&self) -> bool {
        self.traction_active
    }

    /// Ready-to-drive latch.
    #[must_use]
    pub fn ready_to_drive(&self) -> bool {
        self.ready_to_drive
    }
}
