//! Monotonicity of the torque path in temperature and throttle.

use ecu_torque::prelude::*;
use proptest::prelude::*;

const THROTTLE_MAX: i32 = 2047;

fn accel_current(engine: &TorqueEngine, throttle: i32, speed_rpm: i32, temps: ComponentTemps) -> i32 {
    engine
        .compute(&TorqueInputs {
            throttle,
            speed_rpm,
            brake_pressed: false,
            temps,
        })
        .accel_current
}

fn engine() -> Result<TorqueEngine, TestCaseError> {
    TorqueEngine::reference(THROTTLE_MAX).map_err(|e| TestCaseError::fail(e.to_string()))
}

fn temp() -> impl Strategy<Value = i16> {
    -40i16..200
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn prop_accel_non_increasing_in_igbt_temp(
        a in temp(), b in temp(), battery in temp(), motor in temp(),
        throttle in 0..=THROTTLE_MAX, speed in 0i32..10_000,
    ) {
        let engine = engine()?;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let cool = accel_current(&engine, throttle, speed, ComponentTemps::new(lo, battery, motor));
        let hot = accel_current(&engine, throttle, speed, ComponentTemps::new(hi, battery, motor));
        prop_assert!(hot <= cool, "igbt {lo}->{hi}: {cool} -> {hot}");
    }

    #[test]
    fn prop_accel_non_increasing_in_battery_temp(
        a in temp(), b in temp(), igbt in temp(), motor in temp(),
        throttle in 0..=THROTTLE_MAX,
    ) {
        let engine = engine()?;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let cool = accel_current(&engine, throttle, 0, ComponentTemps::new(igbt, lo, motor));
        let hot = accel_current(&engine, throttle, 0, ComponentTemps::new(igbt, hi, motor));
        prop_assert!(hot <= cool);
    }

    #[test]
    fn prop_accel_non_increasing_in_motor_temp(
        a in temp(), b in temp(), igbt in temp(), battery in temp(),
        throttle in 0..=THROTTLE_MAX,
    ) {
        let engine = engine()?;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let cool = accel_current(&engine, throttle, 0, ComponentTemps::new(igbt, battery, lo));
        let hot = accel_current(&engine, throttle, 0, ComponentTemps::new(igbt, battery, hi));
        prop_assert!(hot <= cool);
    }

    #[test]
    fn prop_accel_non_decreasing_in_throttle(
        a in 0..=THROTTLE_MAX, b in 0..=THROTTLE_MAX, speed in 0i32..10_000,
        igbt in temp(), battery in temp(), motor in temp(),
    ) {
        let engine = engine()?;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let temps = ComponentTemps::new(igbt, battery, motor);
        prop_assert!(accel_current(&engine, lo, speed, temps) <= accel_current(&engine, hi, speed, temps));
    }

    #[test]
    fn prop_request_within_limits(
        throttle in 0..=THROTTLE_MAX, speed in -1000i32..20_000, brake in any::<bool>(),
        igbt in temp(), battery in temp(), motor in temp(),
    ) {
        let engine = engine()?;
        let request = engine.compute(&TorqueInputs {
            throttle,
            speed_rpm: speed,
            brake_pressed: brake,
            temps: ComponentTemps::new(igbt, battery, motor),
        });
        prop_assert!((0..=DEFAULT_CURRENT_LIMIT_MA).contains(&request.accel_current));
        prop_assert!((0..=DEFAULT_CURRENT_LIMIT_MA).contains(&request.regen_current));
        prop_assert!(request.accel_current == 0 || request.regen_current == 0);
        if brake {
            prop_assert!(request.is_zero());
        }
    }

    #[test]
    fn prop_pump_duty_non_decreasing_in_each_temp(
        a in temp(), b in temp(), other1 in temp(), other2 in temp(),
    ) {
        let cooling = CoolingEngine::reference().map_err(|e| TestCaseError::fail(e.to_string()))?;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(cooling.pump_duty(lo, other1, other2) <= cooling.pump_duty(hi, other1, other2));
        prop_assert!(cooling.pump_duty(other1, lo, other2) <= cooling.pump_duty(other1, hi, other2));
        prop_assert!(cooling.pump_duty(other1, other2, lo) <= cooling.pump_duty(other1, other2, hi));
    }
}
