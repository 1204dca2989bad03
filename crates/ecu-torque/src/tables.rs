//! Calibration table sets and the reference calibration.
//!
//! Tables are grouped by the engine that consumes them and handed over by
//! value, so each engine owns exactly the curves it evaluates.

use ecu_lut::{LookupTable, LutResult};
use serde::{Deserialize, Serialize};

use crate::error::{TorqueError, TorqueResult};

/// Reference calibration data.
///
/// Temperature keys are °C, throttle keys are canonical pedal units
/// (`0..=2047`) and speed keys are rpm. Values are fractions.
pub mod reference {
    /// Inverter IGBT temperature to torque derate.
    pub const IGBT_DERATE: &[(i32, f32)] = &[
        (0, 1.0),
        (10, 1.0),
        (20, 1.0),
        (30, 1.0),
        (40, 1.0),
        (50, 1.0),
        (60, 1.0),
        (70, 1.0),
        (80, 1.0),
        (90, 1.0),
        (100, 1.0),
        (110, 0.9),
        (120, 0.75),
        (130, 0.25),
        (140, 0.05),
        (150, 0.0),
    ];

    /// Battery temperature to torque derate.
    pub const BATTERY_DERATE: &[(i32, f32)] = &[
        (0, 1.0),
        (5, 1.0),
        (10, 1.0),
        (15, 1.0),
        (20, 1.0),
        (25, 1.0),
        (30, 1.0),
        (35, 1.0),
        (40, 1.0),
        (45, 1.0),
        (50, 0.75),
        (55, 0.25),
        (60, 0.0),
    ];

    /// Motor temperature to torque derate.
    pub const MOTOR_DERATE: &[(i32, f32)] = &[
        (0, 1.0),
        (10, 1.0),
        (20, 1.0),
        (30, 1.0),
        (40, 1.0),
        (50, 1.0),
        (60, 1.0),
        (70, 1.0),
        (80, 0.95),
        (90, 0.75),
        (100, 0.2),
        (110, 0.05),
        (120, 0.0),
    ];

    /// Motor speed to the throttle position that produces no torque.
    pub const SPEED_BASELINE: &[(i32, f32)] = &[
        (0, 0.0),
        (200, 0.0),
        (400, 0.07),
        (600, 0.12),
        (800, 0.16),
        (1000, 0.19),
        (1200, 0.21),
        (1400, 0.22),
        (1600, 0.23),
        (1800, 0.235),
        (2000, 0.239),
        (2200, 0.244),
        (2400, 0.247),
        (2600, 0.25),
        (10000, 0.25),
    ];

    /// Positive throttle delta to acceleration fraction.
    pub const ACCEL: &[(i32, f32)] = &[
        (0, 0.0),
        (102, 0.03),
        (205, 0.09),
        (307, 0.16),
        (409, 0.23),
        (512, 0.30),
        (614, 0.37),
        (716, 0.44),
        (819, 0.51),
        (921, 0.58),
        (1024, 0.65),
        (1126, 0.72),
        (1228, 0.78),
        (1331, 0.83),
        (1433, 0.88),
        (1535, 0.92),
        (1638, 0.95),
        (1740, 0.97),
        (1842, 0.98),
        (1945, 0.99),
        (2047, 1.0),
    ];

    /// Negative throttle delta (magnitude) to regeneration fraction.
    pub const REGEN: &[(i32, f32)] = &[
        (0, 0.0),
        (102, 0.01),
        (205, 0.02),
        (307, 0.03),
        (409, 0.04),
        (512, 0.05),
        (614, 0.07),
        (716, 0.11),
        (819, 0.17),
        (921, 0.24),
        (1024, 0.32),
        (1126, 0.43),
        (1228, 0.54),
        (1331, 0.65),
        (1433, 0.77),
        (1535, 0.85),
        (1638, 0.91),
        (1740, 0.95),
        (1842, 0.97),
        (1945, 0.99),
        (2047, 1.0),
    ];

    /// Motor temperature to pump duty fraction.
    pub const MOTOR_PUMP: &[(i32, f32)] = &[
        (0, 0.0),
        (10, 0.0),
        (20, 0.0),
        (30, 0.0),
        (40, 0.1),
        (50, 0.25),
        (60, 0.5),
        (70, 0.8),
        (80, 0.95),
        (90, 1.0),
        (100, 1.0),
        (110, 1.0),
        (120, 1.0),
    ];

    /// IGBT temperature to pump duty fraction.
    pub const IGBT_PUMP: &[(i32, f32)] = &[
        (0, 0.0),
        (10, 0.0),
        (20, 0.0),
        (30, 0.0),
        (40, 0.0),
        (50, 0.1),
        (60, 0.3),
        (70, 0.55),
        (80, 0.75),
        (90, 0.9),
        (100, 1.0),
        (110, 1.0),
        (120, 1.0),
        (130, 1.0),
        (140, 1.0),
        (150, 1.0),
    ];

    /// Battery temperature to pump duty fraction.
    pub const BATTERY_PUMP: &[(i32, f32)] = &[
        (0, 0.0),
        (5, 0.0),
        (10, 0.0),
        (15, 0.0),
        (20, 0.0),
        (25, 0.0),
        (30, 0.0),
        (35, 0.1),
        (40, 0.4),
        (45, 0.7),
        (50, 0.9),
        (55, 1.0),
        (60, 1.0),
    ];

    /// Coolant temperature to radiator fan duty fraction.
    pub const COOLANT_FAN: &[(i32, f32)] = &[
        (0, 0.0),
        (5, 0.0),
        (10, 0.0),
        (15, 0.0),
        (20, 0.0),
        (25, 0.05),
        (30, 0.15),
        (35, 0.4),
        (40, 0.7),
        (45, 0.9),
        (50, 0.97),
        (55, 1.0),
        (60, 1.0),
    ];
}

fn build(name: &'static str, pairs: &[(i32, f32)]) -> TorqueResult<LookupTable> {
    LookupTable::from_pairs(pairs).map_err(|e| TorqueError::table(name, e))
}

fn check(name: &'static str, result: LutResult<()>) -> TorqueResult<()> {
    result.map_err(|e| TorqueError::table(name, e))
}

/// Check a table is usable as the acceleration curve.
///
/// # Errors
///
/// Returns [`TorqueError::Table`] if a value leaves `[0, 1]` or the curve falls.
pub fn validate_accel_table(table: &LookupTable) -> TorqueResult<()> {
    check("accel", table.ensure_range(0.0, 1.0))?;
    check("accel", table.ensure_non_decreasing())
}

/// Curves consumed by the torque request engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TorqueTables {
    /// Speed to zero-torque throttle fraction.
    pub speed_baseline: LookupTable,
    /// Throttle delta to acceleration fraction.
    pub accel: LookupTable,
    /// Throttle delta magnitude to regeneration fraction.
    pub regen: LookupTable,
    /// IGBT temperature derate.
    pub igbt_derate: LookupTable,
    /// Battery temperature derate.
    pub battery_derate: LookupTable,
    /// Motor temperature derate.
    pub motor_derate: LookupTable,
}

impl TorqueTables {
    /// Reference torque calibration.
    ///
    /// # Errors
    ///
    /// Only fails if the built-in data is malformed.
    pub fn reference() -> TorqueResult<Self> {
        let tables = Self {
            speed_baseline: build("speed_baseline", reference::SPEED_BASELINE)?,
            accel: build("accel", reference::ACCEL)?,
            regen: build("regen", reference::REGEN)?,
            igbt_derate: build("igbt_derate", reference::IGBT_DERATE)?,
            battery_derate: build("battery_derate", reference::BATTERY_DERATE)?,
            motor_derate: build("motor_derate", reference::MOTOR_DERATE)?,
        };
        tables.validate()?;
        Ok(tables)
    }

    /// Check every curve has the shape the torque path relies on.
    ///
    /// Derate curves must stay in `[0, 1]` and never rise with temperature.
    /// Throttle-side curves must stay in `[0, 1]` and never fall.
    ///
    /// # Errors
    ///
    /// Returns [`TorqueError::Table`] naming the first offending curve.
    pub fn validate(&self) -> TorqueResult<()> {
        for (name, table) in [
            ("speed_baseline", &self.speed_baseline),
            ("regen", &self.regen),
        ] {
            check(name, table.ensure_range(0.0, 1.0))?;
            check(name, table.ensure_non_decreasing())?;
        }
        validate_accel_table(&self.accel)?;

        for (name, table) in [
            ("igbt_derate", &self.igbt_derate),
            ("battery_derate", &self.battery_derate),
            ("motor_derate", &self.motor_derate),
        ] {
            check(name, table.ensure_range(0.0, 1.0))?;
            check(name, table.ensure_non_increasing())?;
        }
        Ok(())
    }
}

/// Curves consumed by the cooling engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoolingTables {
    /// Motor temperature to pump duty.
    pub motor_pump: LookupTable,
    /// IGBT temperature to pump duty.
    pub igbt_pump: LookupTable,
    /// Battery temperature to pump duty.
    pub battery_pump: LookupTable,
    /// Coolant temperature to fan duty.
    pub coolant_fan: LookupTable,
}

impl CoolingTables {
    /// Reference cooling calibration.
    ///
    /// # Errors
    ///
    /// Only fails if the built-in data is malformed.
    pub fn reference() -> TorqueResult<Self> {
        let tables = Self {
            motor_pump: build("motor_pump", reference::MOTOR_PUMP)?,
            igbt_pump: build("igbt_pump", reference::IGBT_PUMP)?,
            battery_pump: build("battery_pump", reference::BATTERY_PUMP)?,
            coolant_fan: build("coolant_fan", reference::COOLANT_FAN)?,
        };
        tables.validate()?;
        Ok(tables)
    }

    /// Check every duty curve stays in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`TorqueError::Table`] naming the first offending curve.
    pub fn validate(&self) -> TorqueResult<()> {
        for (name, table) in [
            ("motor_pump", &self.motor_pump),
            ("igbt_pump", &self.igbt_pump),
            ("battery_pump", &self.battery_pump),
            ("coolant_fan", &self.coolant_fan),
        ] {
            check(name, table.ensure_range(0.0, 1.0))?;
        }
        Ok(())
    }
}

/// Complete calibration for both engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSet {
    /// Torque curves.
    pub torque: TorqueTables,
    /// Cooling curves.
    pub cooling: CoolingTables,
}

impl CalibrationSet {
    /// Reference calibration for both engines.
    ///
    /// # Errors
    ///
    /// Only fails if the built-in data is malformed.
    pub fn reference() -> TorqueResult<Self> {
        Ok(Self {
            torque: TorqueTables::reference()?,
            cooling: CoolingTables::reference()?,
        })
    }

    /// Validate both table groups.
    ///
    /// # Errors
    ///
    /// Returns the first table error found.
    pub fn validate(&self) -> TorqueResult<()> {
        self.torque.validate()?;
        self.cooling.validate()
    }
}
