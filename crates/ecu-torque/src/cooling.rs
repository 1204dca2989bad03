//! Pump and fan duty from component and coolant temperatures.
//!
//! Pump duty follows the worst component relative to its own curve, so the
//! three pump fractions combine by `max` rather than by product.

use ecu_lut::scale;
use serde::{Deserialize, Serialize};

use crate::error::{TorqueError, TorqueResult};
use crate::tables::CoolingTables;

/// Full-scale actuator duty byte.
pub const DUTY_MAX: u8 = 255;

/// Temperatures the cooling engine reads.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CoolingInputs {
    /// Motor winding temperature in °C.
    pub motor_c: i16,
    /// Inverter IGBT temperature in °C.
    pub igbt_c: i16,
    /// Battery pack temperature in °C.
    pub battery_c: i16,
    /// Coolant temperature in °C.
    pub coolant_c: f32,
}

/// Duty bytes for the cooling actuators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CoolingDuty {
    /// Coolant pump duty.
    pub pump: u8,
    /// Radiator fan duty.
    pub fan: u8,
}

/// Table-driven cooling duty computation.
#[derive(Debug, Clone)]
pub struct CoolingEngine {
    tables: CoolingTables,
    duty_max: u8,
}

impl CoolingEngine {
    /// Create an engine from validated tables.
    ///
    /// # Errors
    ///
    /// Returns an error if a table fails validation or `duty_max` is zero.
    pub fn new(tables: CoolingTables, duty_max: u8) -> TorqueResult<Self> {
        tables.validate()?;
        if duty_max == 0 {
            return Err(TorqueError::invalid_limit("duty_max must be non-zero"));
        }
        Ok(Self { tables, duty_max })
    }

    /// Engine on the reference calibration with full-scale duty.
    ///
    /// # Errors
    ///
    /// Only fails if the built-in data is malformed.
    pub fn reference() -> TorqueResult<Self> {
        Self::new(CoolingTables::reference()?, DUTY_MAX)
    }

    /// Pump duty for the hottest component.
    #[must_use]
    pub fn pump_duty(&self, motor_c: i16, igbt_c: i16, battery_c: i16) -> u8 {
        let fraction = self
            .tables
            .motor_pump
            .lookup(i32::from(motor_c))
            .max(self.tables.igbt_pump.lookup(i32::from(igbt_c)))
            .max(self.tables.battery_pump.lookup(i32::from(battery_c)));
        scale(fraction, self.duty_max)
    }

    /// Fan duty for a coolant temperature, rounded to the nearest degree first.
    ///
    /// An unreadable (NaN) coolant temperature is treated as the hottest
    /// point of the fan curve.
    #[must_use]
    pub fn fan_duty(&self, coolant_c: f32) -> u8 {
        let key = if coolant_c.is_nan() {
            i32::MAX
        } else {
            // Saturating cast.
            coolant_c.round() as i32
        };
        scale(self.tables.coolant_fan.lookup(key), self.duty_max)
    }

    /// Both duties.
    #[must_use]
    pub fn duty(&self, inputs: &CoolingInputs) -> CoolingDuty {
        CoolingDuty {
            pump: self.pump_duty(inputs.motor_c, inputs.igbt_c, inputs.battery_c),
            fan: self.fan_duty(inputs.coolant_c),
        }
    }

    /// Active calibration.
    #[must_use]
    pub fn tables(&self) -> &CoolingTables {
        &self.tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> CoolingEngine {
        match CoolingEngine::reference() {
            Ok(e) => e,
            Err(e) => panic!("reference cooling engine: {e}"),
        }
    }

    #[test]
    fn test_fan_duty_reference_points() {
        let engine = engine();
        assert_eq!(engine.fan_duty(25.0), 13);
        assert_eq!(engine.fan_duty(32.0), 64);
        assert_eq!(engine.fan_duty(60.0), 255);
        assert_eq!(engine.fan_duty(100.0), 255);
        assert_eq!(engine.fan_duty(-20.0), 0);
    }

    #[test]
    fn test_fan_rounds_temperature_before_lookup() {
        let engine = engine();
        assert_eq!(engine.fan_duty(24.5), engine.fan_duty(25.0));
        assert_eq!(engine.fan_duty(24.4), engine.fan_duty(24.0));
    }

    #[test]
    fn test_unreadable_coolant_runs_fan_flat_out() {
        let engine = engine();
        assert_eq!(engine.fan_duty(f32::NAN), 255);
        assert_eq!(engine.fan_duty(f32::INFINITY), 255);
        assert_eq!(engine.fan_duty(f32::NEG_INFINITY), 0);
    }

    #[test]
    fn test_pump_duty_reference_points() {
        let engine = engine();
        assert_eq!(engine.pump_duty(200, 200, 200), 255);
        assert_eq!(engine.pump_duty(-50, -50, -50), 0);
        assert_eq!(engine.pump_duty(10, 20, 20), 0);
        assert_eq!(engine.pump_duty(30, 50, 60), 255);
    }

    #[test]
    fn test_pump_follows_worst_component() {
        let engine = engine();
        // Motor at 60 °C alone asks for half duty.
        assert_eq!(engine.pump_duty(60, 0, 0), 128);
        assert_eq!(engine.pump_duty(60, 60, 0), engine.pump_duty(60, 0, 0));
    }

    #[test]
    fn test_zero_duty_max_is_rejected() {
        let tables = match CoolingTables::reference() {
            Ok(t) => t,
            Err(e) => panic!("reference tables: {e}"),
        };
        assert!(matches!(CoolingEngine::new(tables, 0), Err(_)));
    }
}
