//! Thermal derating across the inverter, battery and motor.

use serde::{Deserialize, Serialize};

use crate::tables::TorqueTables;

/// Component temperatures in °C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComponentTemps {
    /// Inverter IGBT temperature.
    pub igbt_c: i16,
    /// Battery pack temperature.
    pub battery_c: i16,
    /// Motor winding temperature.
    pub motor_c: i16,
}

impl ComponentTemps {
    /// Create a temperature set.
    #[must_use]
    pub const fn new(igbt_c: i16, battery_c: i16, motor_c: i16) -> Self {
        Self {
            igbt_c,
            battery_c,
            motor_c,
        }
    }
}

/// Per-component derate factors, each in `[0, 1]`.
///
/// The applied derate is the [`product`](Self::product): every hot component
/// must be respected at once, so the most conservative combination wins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThermalDerate {
    /// IGBT factor.
    pub igbt: f32,
    /// Battery factor.
    pub battery: f32,
    /// Motor factor.
    pub motor: f32,
}

impl ThermalDerate {
    /// No derating.
    pub const NONE: Self = Self {
        igbt: 1.0,
        battery: 1.0,
        motor: 1.0,
    };

    /// Evaluate the three derate curves.
    #[must_use]
    pub fn evaluate(tables: &TorqueTables, temps: ComponentTemps) -> Self {
        Self {
            igbt: tables.igbt_derate.lookup(i32::from(temps.igbt_c)),
            battery: tables.battery_derate.lookup(i32::from(temps.battery_c)),
            motor: tables.motor_derate.lookup(i32::from(temps.motor_c)),
        }
    }

    /// Combined derate factor.
    #[must_use]
    pub fn product(&self) -> f32 {
        self.igbt * self.battery * self.motor
    }

    /// Which components are currently limiting output.
    #[must_use]
    pub fn limiting(&self) -> TempLimiting {
        TempLimiting {
            igbt: self.igbt < 1.0,
            battery: self.battery < 1.0,
            motor: self.motor < 1.0,
        }
    }
}

impl Default for ThermalDerate {
    fn default() -> Self {
        Self::NONE
    }
}

/// Components whose derate factor is below 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TempLimiting {
    /// IGBT is limiting.
    pub igbt: bool,
    /// Battery is limiting.
    pub battery: bool,
    /// Motor is limiting.
    pub motor: bool,
}

impl TempLimiting {
    /// True if any component is limiting.
    #[must_use]
    pub fn any(&self) -> bool {
        self.igbt || self.battery || self.motor
    }
}
