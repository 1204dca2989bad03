//! Torque request engine.
//!
//! Turns throttle, motor speed and component temperatures into a pair of
//! inverter current requests:
//!
//! 1. `baseline = scale(speed_baseline(speed), throttle_max)`
//! 2. `delta = throttle - baseline`
//! 3. positive delta drives the accel curve, negative delta the regen curve
//! 4. a pressed brake zeroes both
//! 5. each modifier is multiplied by the thermal derate and scaled to its limit

use ecu_lut::{LookupTable, scale};
use serde::{Deserialize, Serialize};

use crate::derate::{ComponentTemps, ThermalDerate};
use crate::error::{TorqueError, TorqueResult};
use crate::tables::{TorqueTables, reference};

/// Default continuous current limit for both directions, in milliamps.
pub const DEFAULT_CURRENT_LIMIT_MA: i32 = 235_000;

/// Inverter current limits in milliamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentLimits {
    /// Maximum acceleration current.
    pub accel_max_ma: i32,
    /// Maximum regeneration current.
    pub regen_max_ma: i32,
}

impl Default for CurrentLimits {
    fn default() -> Self {
        Self {
            accel_max_ma: DEFAULT_CURRENT_LIMIT_MA,
            regen_max_ma: DEFAULT_CURRENT_LIMIT_MA,
        }
    }
}

impl CurrentLimits {
    /// Validate the limits.
    ///
    /// # Errors
    ///
    /// Returns [`TorqueError::InvalidLimit`] if either limit is negative.
    pub fn validate(&self) -> TorqueResult<()> {
        if self.accel_max_ma < 0 {
            return Err(TorqueError::invalid_limit("accel_max_ma must not be negative"));
        }
        if self.regen_max_ma < 0 {
            return Err(TorqueError::invalid_limit("regen_max_ma must not be negative"));
        }
        Ok(())
    }
}

/// Accel and regen fractions before derating.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TorqueModifiers {
    /// Acceleration fraction.
    pub accel: f32,
    /// Regeneration fraction.
    pub regen: f32,
}

impl TorqueModifiers {
    /// Both fractions zero.
    pub const ZERO: Self = Self {
        accel: 0.0,
        regen: 0.0,
    };
}

/// Current request sent to the inverter, in milliamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TorqueRequest {
    /// Acceleration current.
    pub accel_current: i32,
    /// Regeneration current.
    pub regen_current: i32,
}

impl TorqueRequest {
    /// No torque in either direction.
    pub const ZERO: Self = Self {
        accel_current: 0,
        regen_current: 0,
    };

    /// True if both currents are zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.accel_current == 0 && self.regen_current == 0
    }
}

/// Everything the engine needs for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TorqueInputs {
    /// Resolved throttle in canonical units.
    pub throttle: i32,
    /// Motor speed in rpm.
    pub speed_rpm: i32,
    /// Brake pedal pressed.
    pub brake_pressed: bool,
    /// Component temperatures.
    pub temps: ComponentTemps,
}

/// Table-driven torque request computation.
///
/// # RT Safety
///
/// [`TorqueEngine::compute`] performs a fixed number of table lookups and
/// never allocates.
#[derive(Debug, Clone)]
pub struct TorqueEngine {
    pub(crate) tables: TorqueTables,
    pub(crate) reference_accel: LookupTable,
    pub(crate) accel_table_id: u8,
    limits: CurrentLimits,
    throttle_max: i32,
}

impl TorqueEngine {
    /// Create an engine from validated tables and limits.
    ///
    /// # Errors
    ///
    /// Returns an error if the tables fail validation, a limit is negative
    /// or `throttle_max` is not positive.
    pub fn new(tables: TorqueTables, limits: CurrentLimits, throttle_max: i32) -> TorqueResult<Self> {
        tables.validate()?;
        limits.validate()?;
        if throttle_max <= 0 {
            return Err(TorqueError::invalid_limit("throttle_max must be positive"));
        }

        let reference_accel = LookupTable::from_pairs(reference::ACCEL)
            .map_err(|e| TorqueError::table("accel", e))?;

        Ok(Self {
            tables,
            reference_accel,
            accel_table_id: 0,
            limits,
            throttle_max,
        })
    }

    /// Engine on the reference calibration with default limits.
    ///
    /// # Errors
    ///
    /// Only fails if the built-in data is malformed or `throttle_max` is not positive.
    pub fn reference(throttle_max: i32) -> TorqueResult<Self> {
        Self::new(TorqueTables::reference()?, CurrentLimits::default(), throttle_max)
    }

    /// Throttle position that produces no torque at `speed_rpm`.
    #[must_use]
    pub fn baseline_throttle(&self, speed_rpm: i32) -> i32 {
        scale(self.tables.speed_baseline.lookup(speed_rpm), self.throttle_max)
    }

    /// Throttle relative to the speed baseline.
    #[must_use]
    pub fn throttle_delta(&self, throttle: i32, speed_rpm: i32) -> i32 {
        throttle.saturating_sub(self.baseline_throttle(speed_rpm))
    }

    /// Split the throttle delta into accel and regen fractions.
    ///
    /// A pressed brake zeroes both; regeneration is not blended with the
    /// mechanical brake.
    #[must_use]
    pub fn modifiers(&self, throttle: i32, speed_rpm: i32, brake_pressed: bool) -> TorqueModifiers {
        if brake_pressed {
            return TorqueModifiers::ZERO;
        }
        let delta = self.throttle_delta(throttle, speed_rpm);
        match delta {
            d if d > 0 => TorqueModifiers {
                accel: self.tables.accel.lookup(d),
                regen: 0.0,
            },
            d if d < 0 => TorqueModifiers {
                accel: 0.0,
                regen: self.tables.regen.lookup(d.saturating_neg()),
            },
            _ => TorqueModifiers::ZERO,
        }
    }

    /// Per-component derate for `temps`.
    #[must_use]
    pub fn thermal_derate(&self, temps: ComponentTemps) -> ThermalDerate {
        ThermalDerate::evaluate(&self.tables, temps)
    }

    /// Apply a derate factor to modifiers and scale to the current limits.
    #[must_use]
    pub fn request(&self, derate: f32, modifiers: TorqueModifiers) -> TorqueRequest {
        TorqueRequest {
            accel_current: scale(derate * modifiers.accel, self.limits.accel_max_ma),
            regen_current: scale(derate * modifiers.regen, self.limits.regen_max_ma),
        }
    }

    /// Full pipeline for one control cycle.
    #[must_use]
    pub fn compute(&self, inputs: &TorqueInputs) -> TorqueRequest {
        let derate = self.thermal_derate(inputs.temps);
        let modifiers = self.modifiers(inputs.throttle, inputs.speed_rpm, inputs.brake_pressed);
        let request = self.request(derate.product(), modifiers);

        tracing::trace!(
            throttle = inputs.throttle,
            speed_rpm = inputs.speed_rpm,
            derate = derate.product(),
            accel = request.accel_current,
            regen = request.regen_current,
            "Torque request computed"
        );
        request
    }

    /// Current limits.
    #[must_use]
    pub fn limits(&self) -> CurrentLimits {
        self.limits
    }

    /// Canonical throttle range.
    #[must_use]
    pub fn throttle_max(&self) -> i32 {
        self.throttle_max
    }

    /// Active calibration.
    #[must_use]
    pub fn tables(&self) -> &TorqueTables {
        &self.tables
    }
}
