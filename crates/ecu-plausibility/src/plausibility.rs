//! Pedal plausibility subsystem.
//!
//! Owns the normalized pedal readings, one [`DebounceTimer`] per debounced
//! fault and the BPPC latch. The control cycle calls
//! [`PedalPlausibility::update_sensor_values`] first and
//! [`PedalPlausibility::check_for_implausibilities`] second, so the flags
//! always describe the same sensor snapshot the torque path will read.

use core::time::Duration;

use ecu_lut::scale;
use serde::Serialize;

use crate::debounce::DebounceTimer;
use crate::error::PlausibilityResult;
use crate::faults::{FaultFlags, PedalFault, PlausibilityThresholds};
use crate::pedals::{PedalCalibration, PedalReadings, PedalSensors, RawPedalSample};

/// Snapshot published for telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PedalStatus {
    /// Resolved throttle in canonical units.
    pub throttle: i32,
    /// Front brake in canonical units.
    pub front_brake: i32,
    /// Rear brake in canonical units.
    pub rear_brake: i32,
    /// Front brake above the pressed threshold.
    pub brake_pressed: bool,
    /// Current fault flags.
    pub faults: FaultFlags,
}

/// Debounced pedal fault detection.
///
/// # RT Safety
///
/// Both per-cycle methods are allocation free with bounded execution time.
#[derive(Debug, Clone)]
pub struct PedalPlausibility {
    calibration: PedalCalibration,
    thresholds: PlausibilityThresholds,
    sample: RawPedalSample,
    readings: PedalReadings,
    disagreement: DebounceTimer,
    out_of_range: DebounceTimer,
    brake_circuit: DebounceTimer,
    bppc_trip: i32,
    bppc_rearm: i32,
    bppc_latched: bool,
    flags: FaultFlags,
}

impl PedalPlausibility {
    /// Create the subsystem from a validated calibration and threshold set.
    ///
    /// # Errors
    ///
    /// Returns the first validation error from either argument.
    pub fn new(
        calibration: PedalCalibration,
        thresholds: PlausibilityThresholds,
    ) -> PlausibilityResult<Self> {
        calibration.validate()?;
        thresholds.validate()?;

        let bppc_trip = scale(thresholds.bppc_trip_fraction, calibration.canonical_max);
        let bppc_rearm = scale(thresholds.bppc_rearm_fraction, calibration.canonical_max);
        let sample = RawPedalSample::default();
        let readings = PedalReadings::from_sample(&sample, &calibration);

        Ok(Self {
            disagreement: DebounceTimer::new(thresholds.apps_disagreement_window()),
            out_of_range: DebounceTimer::new(thresholds.apps_range_window()),
            brake_circuit: DebounceTimer::new(thresholds.brake_circuit_window()),
            calibration,
            thresholds,
            sample,
            readings,
            bppc_trip,
            bppc_rearm,
            bppc_latched: false,
            flags: FaultFlags::CLEAR,
        })
    }

    /// Pull a fresh sample from `sensors` and renormalize. No fault logic runs.
    pub fn update_sensor_values<S: PedalSensors + ?Sized>(&mut self, sensors: &mut S) {
        self.apply_sample(sensors.sample());
    }

    /// Renormalize from an already acquired sample.
    pub fn apply_sample(&mut self, sample: RawPedalSample) {
        self.sample = sample;
        self.readings = PedalReadings::from_sample(&sample, &self.calibration);
    }

    /// Run the four pedal checks against the current readings.
    ///
    /// Call on a fixed cadence with a monotonic `now`; the debounce windows
    /// are measured against it.
    pub fn check_for_implausibilities(&mut self, now: Duration) -> FaultFlags {
        let previous = self.flags;
        let readings = self.readings;

        let disagree = readings.apps_difference() > self.thresholds.apps_disagreement_points;
        let out_of_range = !self.calibration.apps_valid.contains(readings.apps1.raw)
            || !self.calibration.apps_valid.contains(readings.apps2.raw);

        let flags = FaultFlags {
            apps_disagreement: self.disagreement.update(disagree, now),
            bppc: self.update_bppc(),
            apps_out_of_range: self.out_of_range.update(out_of_range, now),
            brake_circuit: self
                .brake_circuit
                .update(!readings.brake_circuit_valid, now),
        };

        for fault in PedalFault::ALL {
            match (previous.is_set(fault), flags.is_set(fault)) {
                (false, true) => tracing::warn!(
                    fault = %fault,
                    throttle = self.get_throttle(),
                    apps1 = readings.apps1.raw,
                    apps2 = readings.apps2.raw,
                    "Pedal fault raised"
                ),
                (true, false) if fault.is_self_clearing() => {
                    tracing::info!(fault = %fault, "Pedal fault cleared");
                }
                (true, false) => tracing::info!(
                    fault = %fault,
                    throttle = self.get_throttle(),
                    "Pedal fault re-armed"
                ),
                _ => {}
            }
        }

        self.flags = flags;
        flags
    }

    /// BPPC stays latched through a momentary clear until the driver lifts
    /// below the re-arm point.
    fn update_bppc(&mut self) -> bool {
        let throttle = self.get_throttle();
        if self.bppc_latched {
            if throttle < self.bppc_rearm {
                self.bppc_latched = false;
            }
        } else if self.both_brakes_pressed() && throttle > self.bppc_trip {
            self.bppc_latched = true;
        }
        self.bppc_latched
    }

    fn both_brakes_pressed(&self) -> bool {
        let threshold = self.calibration.brake_pressed_raw;
        self.readings.front_brake.raw > threshold && self.readings.rear_brake.raw > threshold
    }

    /// True if any pedal fault flag is set.
    #[must_use]
    pub fn is_implausibility_present(&self) -> bool {
        self.flags.any()
    }

    /// Resolved throttle in `0..=canonical_max`.
    #[must_use]
    pub fn get_throttle(&self) -> i32 {
        self.readings.apps1.scaled
    }

    /// Front brake above the pressed threshold.
    #[must_use]
    pub fn is_brake_pressed(&self) -> bool {
        self.readings.front_brake.raw > self.calibration.brake_pressed_raw
    }

    /// Flags from the most recent check.
    #[must_use]
    pub fn faults(&self) -> FaultFlags {
        self.flags
    }

    /// Readings from the most recent sensor update.
    #[must_use]
    pub fn readings(&self) -> &PedalReadings {
        &self.readings
    }

    /// Most recent raw sample.
    #[must_use]
    pub fn raw_sample(&self) -> RawPedalSample {
        self.sample
    }

    /// Throttle above which braking trips BPPC.
    #[must_use]
    pub fn bppc_trip_threshold(&self) -> i32 {
        self.bppc_trip
    }

    /// Throttle below which a latched BPPC clears.
    #[must_use]
    pub fn bppc_rearm_threshold(&self) -> i32 {
        self.bppc_rearm
    }

    /// Active calibration.
    #[must_use]
    pub fn calibration(&self) -> &PedalCalibration {
        &self.calibration
    }

    /// Active thresholds.
    #[must_use]
    pub fn thresholds(&self) -> &PlausibilityThresholds {
        &self.thresholds
    }

    /// Telemetry snapshot of the current readings and flags.
    #[must_use]
    pub fn status(&self) -> PedalStatus {
        PedalStatus {
            throttle: self.get_throttle(),
            front_brake: self.readings.front_brake.scaled,
            rear_brake: self.readings.rear_brake.scaled,
            brake_pressed: self.is_brake_pressed(),
            faults: self.flags,
        }
    }
}
