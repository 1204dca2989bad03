//! Unit tests for the plausibility subsystem.

use super::{must, sample, subsystem};
use crate::*;
use core::time::Duration;

const RELEASED: u16 = 400;
const PRESSED: u16 = 2000;

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// Apply `sample` and run one check at `t_ms`.
fn cycle(pedals: &mut PedalPlausibility, sample: RawPedalSample, t_ms: u64) -> FaultFlags {
    pedals.apply_sample(sample);
    pedals.check_for_implausibilities(ms(t_ms))
}

#[test]
fn test_agreeing_pedals_raise_nothing() {
    let mut pedals = subsystem();
    for i in 0..50 {
        let flags = cycle(&mut pedals, sample(40, 40, RELEASED), i * 10);
        assert_eq!(flags, FaultFlags::CLEAR);
    }
    assert!(!pedals.is_implausibility_present());
    assert_eq!(pedals.get_throttle(), 818);
}

#[test]
fn test_disagreement_fires_after_window() {
    let mut pedals = subsystem();
    for i in 0..10 {
        let flags = cycle(&mut pedals, sample(50, 30, RELEASED), i * 10);
        assert!(!flags.apps_disagreement, "fired early at cycle {i}");
    }
    let flags = cycle(&mut pedals, sample(50, 30, RELEASED), 100);
    assert!(flags.apps_disagreement);
    assert!(pedals.is_implausibility_present());
}

#[test]
fn test_disagreement_at_margin_is_tolerated() {
    let mut pedals = subsystem();
    for i in 0..30 {
        let flags = cycle(&mut pedals, sample(50, 40, RELEASED), i * 10);
        assert!(!flags.apps_disagreement);
    }
}

#[test]
fn test_disagreement_clears_immediately_and_rearms() {
    let mut pedals = subsystem();
    for i in 0..=10 {
        cycle(&mut pedals, sample(50, 30, RELEASED), i * 10);
    }
    assert!(pedals.faults().apps_disagreement);

    let flags = cycle(&mut pedals, sample(50, 50, RELEASED), 110);
    assert!(!flags.apps_disagreement);

    // A fresh occurrence needs a full window again.
    assert!(!cycle(&mut pedals, sample(50, 30, RELEASED), 120).apps_disagreement);
    assert!(!cycle(&mut pedals, sample(50, 30, RELEASED), 210).apps_disagreement);
    assert!(cycle(&mut pedals, sample(50, 30, RELEASED), 220).apps_disagreement);
}

#[test]
fn test_out_of_range_apps_is_debounced() {
    let mut pedals = subsystem();
    let shorted = RawPedalSample {
        apps1: 4000,
        apps2: 400,
        ..sample(0, 0, RELEASED)
    };

    assert!(!cycle(&mut pedals, shorted, 0).apps_out_of_range);
    assert!(!cycle(&mut pedals, shorted, 90).apps_out_of_range);
    let flags = cycle(&mut pedals, shorted, 100);
    assert!(flags.apps_out_of_range);
    assert!(!flags.apps_disagreement);

    assert!(!cycle(&mut pedals, sample(0, 0, RELEASED), 110).apps_out_of_range);
}

#[test]
fn test_open_circuit_apps2_is_out_of_range() {
    let mut pedals = subsystem();
    let open = RawPedalSample {
        apps2: 0,
        ..sample(100, 100, RELEASED)
    };
    cycle(&mut pedals, open, 0);
    assert!(cycle(&mut pedals, open, 100).apps_out_of_range);
}

#[test]
fn test_brake_circuit_fault_is_debounced() {
    let mut pedals = subsystem();
    let invalid = RawPedalSample {
        brake_circuit_valid: false,
        ..sample(0, 0, RELEASED)
    };
    assert!(!cycle(&mut pedals, invalid, 0).brake_circuit);
    assert!(!cycle(&mut pedals, invalid, 50).brake_circuit);
    assert!(cycle(&mut pedals, invalid, 100).brake_circuit);
    assert!(!cycle(&mut pedals, sample(0, 0, RELEASED), 110).brake_circuit);
}

#[test]
fn test_bppc_trips_immediately() {
    let mut pedals = subsystem();
    let flags = cycle(&mut pedals, sample(30, 30, PRESSED), 0);
    assert!(flags.bppc);
    assert!(pedals.is_implausibility_present());
}

#[test]
fn test_bppc_needs_both_brakes() {
    let mut pedals = subsystem();
    let front_only = RawPedalSample {
        rear_brake: RELEASED,
        ..sample(30, 30, PRESSED)
    };
    assert!(!cycle(&mut pedals, front_only, 0).bppc);
    assert!(pedals.is_brake_pressed());
}

#[test]
fn test_bppc_needs_throttle_above_trip() {
    let mut pedals = subsystem();
    assert_eq!(pedals.bppc_trip_threshold(), 512);
    assert!(!cycle(&mut pedals, sample(25, 25, PRESSED), 0).bppc);
}

#[test]
fn test_bppc_latch_holds_until_rearm() {
    let mut pedals = subsystem();
    assert_eq!(pedals.bppc_rearm_threshold(), 102);
    assert!(cycle(&mut pedals, sample(30, 30, PRESSED), 0).bppc);

    // Brake released, throttle still open: stays latched.
    assert!(cycle(&mut pedals, sample(30, 30, RELEASED), 10).bppc);
    assert!(cycle(&mut pedals, sample(10, 10, RELEASED), 20).bppc);
    // 5 % scales to exactly the re-arm point, which is not below it.
    assert!(cycle(&mut pedals, sample(5, 5, RELEASED), 30).bppc);
    assert!(!cycle(&mut pedals, sample(4, 4, RELEASED), 40).bppc);
    assert!(!pedals.is_implausibility_present());
}

#[test]
fn test_only_latched_faults_outlive_their_cause() {
    let mut pedals = subsystem();
    for i in 0..=10 {
        cycle(&mut pedals, sample(50, 30, PRESSED), i * 10);
    }
    let raised = pedals.faults();
    assert_eq!(
        raised.active().collect::<Vec<_>>(),
        vec![
            PedalFault::AppsDisagreement,
            PedalFault::BrakePedalPositionConflict
        ]
    );

    // Sensors agree and the brake is released, throttle still above re-arm.
    let after = cycle(&mut pedals, sample(15, 15, RELEASED), 110);
    for fault in raised.active() {
        assert_eq!(after.is_set(fault), !fault.is_self_clearing(), "{fault}");
    }
}

#[test]
fn test_custom_rearm_fraction() {
    let thresholds = PlausibilityThresholds::default().with_bppc(0.25, 0.10);
    let mut pedals = must(PedalPlausibility::new(PedalCalibration::default(), thresholds));
    assert!(cycle(&mut pedals, sample(30, 30, PRESSED), 0).bppc);
    assert!(!cycle(&mut pedals, sample(9, 9, RELEASED), 10).bppc);
}

#[test]
fn test_brake_pressed_threshold_is_strict() {
    let mut pedals = subsystem();
    pedals.apply_sample(sample(0, 0, 1000));
    assert!(!pedals.is_brake_pressed());
    pedals.apply_sample(sample(0, 0, 1001));
    assert!(pedals.is_brake_pressed());
}

#[test]
fn test_update_sensor_values_reads_collaborator() {
    struct Counting {
        reads: u32,
    }

    impl PedalSensors for Counting {
        fn sample(&mut self) -> RawPedalSample {
            self.reads += 1;
            sample(20, 20, RELEASED)
        }
    }

    let mut pedals = subsystem();
    let mut sensors = Counting { reads: 0 };
    pedals.update_sensor_values(&mut sensors);
    assert_eq!(sensors.reads, 1);
    assert_eq!(pedals.raw_sample(), sample(20, 20, RELEASED));
    assert_eq!(pedals.get_throttle(), 409);
}

#[test]
fn test_update_does_not_touch_flags() {
    let mut pedals = subsystem();
    cycle(&mut pedals, sample(30, 30, PRESSED), 0);
    pedals.apply_sample(sample(0, 0, RELEASED));
    assert!(pedals.faults().bppc);
}

#[test]
fn test_status_snapshot() {
    let mut pedals = subsystem();
    cycle(&mut pedals, sample(30, 30, PRESSED), 0);
    let status = pedals.status();
    assert_eq!(status.throttle, 614);
    assert!(status.brake_pressed);
    assert!(status.faults.bppc);
    assert_eq!(status.faults.bits(), PedalFault::BrakePedalPositionConflict.bit());
}

#[test]
fn test_rejects_invalid_thresholds() {
    let thresholds = PlausibilityThresholds::default().with_bppc(0.0, 0.0);
    assert!(matches!(PedalPlausibility::new(PedalCalibration::default(), thresholds), Err(_)));
}
