//! Crate-internal test suites.

mod unit_tests;

use crate::*;

pub(crate) fn must<T, E: core::fmt::Debug>(result: Result<T, E>) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("unexpected error: {e:?}"),
    }
}

/// Raw sample for the default calibration with each accelerator at a
/// whole-number percentage of travel. The default spans are 3300 counts
/// wide, so one percent is exactly 33 counts.
pub(crate) fn sample(apps1_pct: u16, apps2_pct: u16, brake_raw: u16) -> RawPedalSample {
    RawPedalSample {
        apps1: 400 + apps1_pct * 33,
        apps2: 3700 - apps2_pct * 33,
        front_brake: brake_raw,
        rear_brake: brake_raw,
        brake_circuit_valid: true,
    }
}

pub(crate) fn subsystem() -> PedalPlausibility {
    must(PedalPlausibility::new(
        PedalCalibration::default(),
        PlausibilityThresholds::default(),
    ))
}
