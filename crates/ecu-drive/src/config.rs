//! Controller configuration.
//!
//! Everything here has a default matching the reference vehicle, so an
//! empty JSON object is a valid configuration.

use core::time::Duration;
use std::path::Path;

use ecu_plausibility::{PedalCalibration, PlausibilityThresholds};
use ecu_torque::{CalibrationSet, CurrentLimits, DUTY_MAX};
use serde::{Deserialize, Serialize};

use crate::error::{EcuError, EcuResult};

/// Default control cycle period in milliseconds.
pub const DEFAULT_CONTROL_PERIOD_MS: u64 = 10;

/// Default housekeeping period in milliseconds.
pub const DEFAULT_HOUSEKEEPING_PERIOD_MS: u64 = 100;

/// Active aero settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AeroConfig {
    /// Accel current, as a fraction of the accel limit, above which the flaps open.
    pub open_accel_fraction: f32,
}

impl Default for AeroConfig {
    fn default() -> Self {
        Self {
            open_accel_fraction: 0.25,
        }
    }
}

impl AeroConfig {
    /// Validate the settings.
    ///
    /// # Errors
    ///
    /// Returns [`EcuError::InvalidConfiguration`] if the fraction is not in `[0, 1]`.
    pub fn validate(&self) -> EcuResult<()> {
        if !(0.0..=1.0).contains(&self.open_accel_fraction) {
            return Err(EcuError::invalid_configuration(format!(
                "aero open_accel_fraction {} must be within [0, 1]",
                self.open_accel_fraction
            )));
        }
        Ok(())
    }
}

/// Complete controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EcuConfig {
    /// Control cycle period.
    pub control_period_ms: u64,
    /// Housekeeping period.
    pub housekeeping_period_ms: u64,
    /// Inverter current limits.
    pub current_limits: CurrentLimits,
    /// Full-scale cooling duty.
    pub duty_max: u8,
    /// Pedal sensor calibration, including the canonical throttle range.
    pub pedals: PedalCalibration,
    /// Fault thresholds and debounce windows.
    pub plausibility: PlausibilityThresholds,
    /// Active aero settings.
    pub aero: AeroConfig,
    /// Replacement calibration tables; the reference set when absent.
    pub tables: Option<CalibrationSet>,
}

impl Default for EcuConfig {
    fn default() -> Self {
        Self {
            control_period_ms: DEFAULT_CONTROL_PERIOD_MS,
            housekeeping_period_ms: DEFAULT_HOUSEKEEPING_PERIOD_MS,
            current_limits: CurrentLimits::default(),
            duty_max: DUTY_MAX,
            pedals: PedalCalibration::default(),
            plausibility: PlausibilityThresholds::default(),
            aero: AeroConfig::default(),
            tables: None,
        }
    }
}

impl EcuConfig {
    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EcuError::Parse`] for malformed JSON or a malformed table,
    /// and the validation error otherwise.
    pub fn from_json_str(json: &str) -> EcuResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`EcuError::Io`] if the file cannot be read, otherwise as
    /// [`EcuConfig::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> EcuResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| EcuError::io(path, e))?;
        let config = Self::from_json_str(&text)?;
        tracing::info!(path = %path.display(), "Loaded ECU configuration");
        Ok(config)
    }

    /// Pretty JSON rendering.
    ///
    /// # Errors
    ///
    /// Returns [`EcuError::Parse`] if serialization fails.
    pub fn to_json_pretty(&self) -> EcuResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set the control period.
    #[must_use]
    pub fn with_control_period_ms(mut self, ms: u64) -> Self {
        self.control_period_ms = ms;
        self
    }

    /// Set the housekeeping period.
    #[must_use]
    pub fn with_housekeeping_period_ms(mut self, ms: u64) -> Self {
        self.housekeeping_period_ms = ms;
        self
    }

    /// Set the inverter current limits.
    #[must_use]
    pub fn with_current_limits(mut self, limits: CurrentLimits) -> Self {
        self.current_limits = limits;
        self
    }

    /// Set the full-scale cooling duty.
    #[must_use]
    pub fn with_duty_max(mut self, duty_max: u8) -> Self {
        self.duty_max = duty_max;
        self
    }

    /// Set the pedal calibration.
    #[must_use]
    pub fn with_pedals(mut self, pedals: PedalCalibration) -> Self {
        self.pedals = pedals;
        self
    }

    /// Set the plausibility thresholds.
    #[must_use]
    pub fn with_plausibility(mut self, thresholds: PlausibilityThresholds) -> Self {
        self.plausibility = thresholds;
        self
    }

    /// Set the active aero settings.
    #[must_use]
    pub fn with_aero(mut self, aero: AeroConfig) -> Self {
        self.aero = aero;
        self
    }

    /// Replace the calibration tables.
    #[must_use]
    pub fn with_tables(mut self, tables: CalibrationSet) -> Self {
        self.tables = Some(tables);
        self
    }

    /// Control cycle period.
    #[must_use]
    pub fn control_period(&self) -> Duration {
        Duration::from_millis(self.control_period_ms)
    }

    /// Housekeeping period.
    #[must_use]
    pub fn housekeeping_period(&self) -> Duration {
        Duration::from_millis(self.housekeeping_period_ms)
    }

    /// Canonical throttle range shared by the pedals and the torque tables.
    #[must_use]
    pub fn throttle_max(&self) -> i32 {
        self.pedals.canonical_max
    }

    /// The calibration in effect: the override tables or the reference set.
    ///
    /// # Errors
    ///
    /// Returns [`EcuError::Calibration`] if the override fails validation.
    pub fn calibration(&self) -> EcuResult<CalibrationSet> {
        match &self.tables {
            Some(tables) => {
                tables.validate()?;
                Ok(tables.clone())
            }
            None => Ok(CalibrationSet::reference()?),
        }
    }

    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> EcuResult<()> {
        if self.control_period_ms == 0 {
            return Err(EcuError::invalid_configuration(
                "control_period_ms must be non-zero",
            ));
        }
        if self.housekeeping_period_ms < self.control_period_ms {
            return Err(EcuError::invalid_configuration(format!(
                "housekeeping_period_ms {} is shorter than control_period_ms {}",
                self.housekeeping_period_ms, self.control_period_ms
            )));
        }
        if self.duty_max == 0 {
            return Err(EcuError::invalid_configuration("duty_max must be non-zero"));
        }
        self.current_limits.validate()?;
        self.pedals.validate()?;
        self.plausibility.validate()?;
        self.aero.validate()?;
        if let Some(tables) = &self.tables {
            tables.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecu_lut::LookupTable;

    fn must<T, E: std::fmt::Debug>(result: Result<T, E>) -> T {
        match result {
            Ok(v) => v,
            Err(e) => panic!("unexpected error: {e:?}"),
        }
    }

    #[test]
    fn test_default_is_valid() {
        let config = EcuConfig::default();
        assert!(matches!(config.validate(), Ok(_)));
        assert_eq!(config.control_period(), Duration::from_millis(10));
        assert_eq!(config.housekeeping_period(), Duration::from_millis(100));
        assert_eq!(config.throttle_max(), 2047);
    }

    #[test]
    fn test_empty_object_is_default() {
        let config = must(EcuConfig::from_json_str("{}"));
        assert_eq!(config, EcuConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = must(EcuConfig::from_json_str(
            r#"{ "control_period_ms": 5, "current_limits": { "accel_max_ma": 100000 } }"#,
        ));
        assert_eq!(config.control_period_ms, 5);
        assert_eq!(config.current_limits.accel_max_ma, 100_000);
        assert_eq!(config.current_limits.regen_max_ma, 235_000);
    }

    #[test]
    fn test_rejects_zero_period() {
        let config = EcuConfig::default().with_control_period_ms(0);
        assert!(matches!(
            config.validate(),
            Err(EcuError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_rejects_housekeeping_faster_than_control() {
        let config = EcuConfig::default().with_housekeeping_period_ms(5);
        assert!(matches!(config.validate(), Err(_)));
    }

    #[test]
    fn test_rejects_bad_pedal_calibration() {
        let config = EcuConfig::default()
            .with_pedals(PedalCalibration::default().with_canonical_max(0));
        assert!(matches!(config.validate(), Err(EcuError::Plausibility(_))));
    }

    #[test]
    fn test_rejects_unsorted_table_at_parse_time() {
        let json = r#"{ "tables": { "torque": { "accel": [[0, 0.0], [0, 1.0]] } } }"#;
        assert!(matches!(
            EcuConfig::from_json_str(json),
            Err(EcuError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_rising_derate_override() {
        let mut tables = must(CalibrationSet::reference());
        tables.torque.igbt_derate = must(LookupTable::from_pairs(&[(0, 0.0), (150, 1.0)]));
        let config = EcuConfig::default().with_tables(tables);
        assert!(matches!(config.validate(), Err(EcuError::Calibration(_))));
        assert!(matches!(config.calibration(), Err(_)));
    }

    #[test]
    fn test_json_round_trip_with_tables() {
        let config = EcuConfig::default()
            .with_tables(must(CalibrationSet::reference()))
            .with_aero(AeroConfig {
                open_accel_fraction: 0.5,
            });
        let json = must(config.to_json_pretty());
        let back = must(EcuConfig::from_json_str(&json));
        assert_eq!(back, config);
    }

    #[test]
    fn test_rejects_aero_fraction_out_of_range() {
        let config = EcuConfig::default().with_aero(AeroConfig {
            open_accel_fraction: 1.5,
        });
        assert!(matches!(config.validate(), Err(_)));
    }
}
