//! End-to-end torque and cooling scenarios on the reference calibration.

use ecu_lut::{LookupTable, scale};
use ecu_torque::prelude::*;
use ecu_torque::tables::reference;

type TestResult = Result<(), Box<dyn std::error::Error>>;

const THROTTLE_MAX: i32 = 2047;

fn inputs(throttle: i32, igbt_c: i16, battery_c: i16, motor_c: i16) -> TorqueInputs {
    TorqueInputs {
        throttle,
        speed_rpm: 0,
        brake_pressed: false,
        temps: ComponentTemps::new(igbt_c, battery_c, motor_c),
    }
}

#[test]
fn cold_components_and_closed_throttle_request_nothing() -> TestResult {
    let engine = TorqueEngine::reference(THROTTLE_MAX)?;
    let request = engine.compute(&inputs(0, 0, 0, 0));
    assert_eq!(request.accel_current, 0);
    assert_eq!(request.regen_current, 0);
    Ok(())
}

#[test]
fn warm_components_match_independent_table_evaluation() -> TestResult {
    let engine = TorqueEngine::reference(THROTTLE_MAX)?;
    let request = engine.compute(&inputs(2000, 98, 33, 3));

    let igbt = LookupTable::from_pairs(reference::IGBT_DERATE)?.lookup(98);
    let battery = LookupTable::from_pairs(reference::BATTERY_DERATE)?.lookup(33);
    let motor = LookupTable::from_pairs(reference::MOTOR_DERATE)?.lookup(3);
    let accel = LookupTable::from_pairs(reference::ACCEL)?.lookup(2000);
    let expected = scale(igbt * battery * motor * accel, DEFAULT_CURRENT_LIMIT_MA);

    assert_eq!(request.accel_current, expected);
    assert_eq!(request.accel_current, 233_917);
    assert_eq!(request.regen_current, 0);
    Ok(())
}

#[test]
fn overheated_motor_suppresses_any_throttle() -> TestResult {
    let engine = TorqueEngine::reference(THROTTLE_MAX)?;
    for throttle in [0, 500, 1024, 2000, THROTTLE_MAX] {
        let request = engine.compute(&inputs(throttle, 20, 20, 200));
        assert_eq!(request.accel_current, 0, "throttle {throttle}");
    }
    assert_eq!(engine.thermal_derate(ComponentTemps::new(20, 20, 200)).motor.to_bits(), 0.0f32.to_bits());
    Ok(())
}

#[test]
fn igbt_midpoint_derate() -> TestResult {
    let engine = TorqueEngine::reference(THROTTLE_MAX)?;
    let derate = engine.thermal_derate(ComponentTemps::new(115, 20, 20));
    approx::assert_relative_eq!(derate.igbt, 0.825, epsilon = 1e-6);
    assert!(derate.limiting().igbt);
    Ok(())
}

#[test]
fn coasting_at_speed_requests_regen() -> TestResult {
    let engine = TorqueEngine::reference(THROTTLE_MAX)?;
    let request = engine.compute(&TorqueInputs {
        throttle: 0,
        speed_rpm: 5000,
        brake_pressed: false,
        temps: ComponentTemps::default(),
    });
    assert_eq!(request.accel_current, 0);
    assert_eq!(request.regen_current, scale(0.05, DEFAULT_CURRENT_LIMIT_MA));
    Ok(())
}

#[test]
fn braking_while_coasting_requests_nothing() -> TestResult {
    let engine = TorqueEngine::reference(THROTTLE_MAX)?;
    let request = engine.compute(&TorqueInputs {
        throttle: 0,
        speed_rpm: 5000,
        brake_pressed: true,
        temps: ComponentTemps::default(),
    });
    assert!(request.is_zero());
    Ok(())
}

#[test]
fn custom_limits_bound_the_request() -> TestResult {
    let limits = CurrentLimits {
        accel_max_ma: 100_000,
        regen_max_ma: 50_000,
    };
    let engine = TorqueEngine::new(TorqueTables::reference()?, limits, THROTTLE_MAX)?;
    let request = engine.compute(&inputs(THROTTLE_MAX, 0, 0, 0));
    assert_eq!(request.accel_current, 100_000);
    Ok(())
}

#[test]
fn cooling_duty_reference_points() -> TestResult {
    let cooling = CoolingEngine::reference()?;
    let duty = cooling.duty(&CoolingInputs {
        motor_c: 30,
        igbt_c: 50,
        battery_c: 60,
        coolant_c: 32.0,
    });
    assert_eq!(duty, CoolingDuty { pump: 255, fan: 64 });

    let idle = cooling.duty(&CoolingInputs {
        motor_c: 10,
        igbt_c: 20,
        battery_c: 20,
        coolant_c: -20.0,
    });
    assert_eq!(idle, CoolingDuty { pump: 0, fan: 0 });
    Ok(())
}

#[test]
fn calibration_set_survives_json() -> TestResult {
    let set = CalibrationSet::reference()?;
    let json = serde_json::to_string(&set)?;
    let back: CalibrationSet = serde_json::from_str(&json)?;
    assert_eq!(back, set);
    Ok(())
}

#[test]
fn unsorted_table_in_json_is_rejected() {
    let json = r#"[[0, 0.0], [100, 0.5], [50, 1.0]]"#;
    assert!(matches!(serde_json::from_str::<LookupTable>(json), Err(_)));
}
