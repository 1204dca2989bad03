//! Multi-cycle pedal fault scenarios driven through the public API.

use core::time::Duration;
use ecu_plausibility::prelude::*;

type TestResult = Result<(), PlausibilityError>;

const CYCLE: Duration = Duration::from_millis(10);

/// Sensor stand-in the test can re-aim between cycles.
struct Bench {
    current: RawPedalSample,
}

impl PedalSensors for Bench {
    fn sample(&mut self) -> RawPedalSample {
        self.current
    }
}

fn pedals_at(apps1_pct: u16, apps2_pct: u16) -> RawPedalSample {
    RawPedalSample {
        apps1: 400 + apps1_pct * 33,
        apps2: 3700 - apps2_pct * 33,
        front_brake: 400,
        rear_brake: 400,
        brake_circuit_valid: true,
    }
}

fn run_cycle(pedals: &mut PedalPlausibility, bench: &mut Bench, index: u32) -> FaultFlags {
    pedals.update_sensor_values(bench);
    pedals.check_for_implausibilities(CYCLE * index)
}

#[test]
fn apps_disagreement_held_for_150ms() -> TestResult {
    let mut pedals = PedalPlausibility::new(PedalCalibration::default(), PlausibilityThresholds::default())?;
    let mut bench = Bench {
        current: pedals_at(60, 40),
    };

    for cycle in 0..15 {
        let flags = run_cycle(&mut pedals, &mut bench, cycle);
        if cycle < 10 {
            assert!(!flags.apps_disagreement, "raised early at cycle {cycle}");
            assert!(!pedals.is_implausibility_present());
        } else {
            assert!(flags.apps_disagreement, "missing at cycle {cycle}");
            assert!(pedals.is_implausibility_present());
        }
    }
    Ok(())
}

#[test]
fn brief_disagreement_glitch_is_ignored() -> TestResult {
    let mut pedals = PedalPlausibility::new(PedalCalibration::default(), PlausibilityThresholds::default())?;
    let mut bench = Bench {
        current: pedals_at(50, 50),
    };

    for cycle in 0..100 {
        // 90 ms of disagreement every 200 ms never reaches the window.
        bench.current = if cycle % 20 < 9 {
            pedals_at(70, 30)
        } else {
            pedals_at(50, 50)
        };
        let flags = run_cycle(&mut pedals, &mut bench, cycle);
        assert!(!flags.apps_disagreement, "raised at cycle {cycle}");
    }
    Ok(())
}

#[test]
fn faults_are_independent() -> TestResult {
    let mut pedals = PedalPlausibility::new(PedalCalibration::default(), PlausibilityThresholds::default())?;
    let mut bench = Bench {
        current: RawPedalSample {
            brake_circuit_valid: false,
            ..pedals_at(0, 0)
        },
    };

    for cycle in 0..5 {
        run_cycle(&mut pedals, &mut bench, cycle);
    }
    // Disagreement starts 50 ms after the brake circuit fault.
    bench.current = RawPedalSample {
        brake_circuit_valid: false,
        ..pedals_at(40, 0)
    };
    let mut flags = FaultFlags::CLEAR;
    for cycle in 5..=10 {
        flags = run_cycle(&mut pedals, &mut bench, cycle);
    }
    assert!(flags.brake_circuit);
    assert!(!flags.apps_disagreement);

    for cycle in 11..=15 {
        flags = run_cycle(&mut pedals, &mut bench, cycle);
    }
    assert!(flags.brake_circuit && flags.apps_disagreement);
    assert_eq!(flags.active().count(), 2);
    Ok(())
}

#[test]
fn longer_debounce_from_config() -> TestResult {
    let thresholds = PlausibilityThresholds::default().with_debounce_ms(250);
    let mut pedals = PedalPlausibility::new(PedalCalibration::default(), thresholds)?;
    let mut bench = Bench {
        current: pedals_at(80, 20),
    };

    for cycle in 0..25 {
        assert!(!run_cycle(&mut pedals, &mut bench, cycle).apps_disagreement);
    }
    assert!(run_cycle(&mut pedals, &mut bench, 25).apps_disagreement);
    Ok(())
}

#[test]
fn status_serializes_for_telemetry() -> Result<(), Box<dyn std::error::Error>> {
    let mut pedals = PedalPlausibility::new(PedalCalibration::default(), PlausibilityThresholds::default())?;
    let mut bench = Bench {
        current: pedals_at(50, 50),
    };
    run_cycle(&mut pedals, &mut bench, 0);

    let json = serde_json::to_value(pedals.status())?;
    assert_eq!(json["throttle"], 1023);
    assert_eq!(json["faults"]["bppc"], false);
    Ok(())
}
