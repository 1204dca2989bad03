//! Pedal sensor calibration and normalization.
//!
//! Raw readings arrive as 12-bit ADC counts. The two accelerator sensors are
//! wired with opposite slopes, so APPS2 is mapped in reverse before the two
//! are compared.

use serde::{Deserialize, Serialize};

use crate::error::{PlausibilityError, PlausibilityResult};

/// Full-scale 12-bit ADC reading.
pub const ADC_FULL_SCALE: u16 = 4095;

/// Default canonical throttle range, matching the torque table key span.
pub const DEFAULT_CANONICAL_MAX: i32 = 2047;

/// Calibrated travel of one pedal sensor in ADC counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdcSpan {
    /// Reading at one end of travel.
    pub min: u16,
    /// Reading at the other end of travel.
    pub max: u16,
}

impl AdcSpan {
    /// Create a span.
    #[must_use]
    pub const fn new(min: u16, max: u16) -> Self {
        Self { min, max }
    }

    /// Width of the span in counts (zero if inverted).
    #[must_use]
    pub fn width(&self) -> u16 {
        self.max.saturating_sub(self.min)
    }

    /// Travel in counts from the rest end, clamped to the span.
    fn travel(&self, raw: u16, reversed: bool) -> u16 {
        let raw = raw.clamp(self.min, self.max);
        if reversed {
            self.max.saturating_sub(raw)
        } else {
            raw.saturating_sub(self.min)
        }
    }

    /// Position as a percentage of travel, clamped to `0.0..=100.0`.
    #[must_use]
    pub fn percent(&self, raw: u16, reversed: bool) -> f32 {
        let width = self.width();
        if width == 0 {
            return 0.0;
        }
        f32::from(self.travel(raw, reversed)) * 100.0 / f32::from(width)
    }

    /// Position scaled to `0..=full_scale`, clamped to the span.
    #[must_use]
    pub fn scaled(&self, raw: u16, full_scale: i32, reversed: bool) -> i32 {
        let width = i64::from(self.width());
        if width == 0 {
            return 0;
        }
        let scaled = i64::from(self.travel(raw, reversed)) * i64::from(full_scale) / width;
        i32::try_from(scaled).unwrap_or(full_scale)
    }
}

/// Raw-count window outside which a sensor is considered open or shorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityWindow {
    /// Lowest healthy reading (inclusive).
    pub low: u16,
    /// Highest healthy reading (inclusive).
    pub high: u16,
}

impl ValidityWindow {
    /// True if `raw` lies within the window.
    #[must_use]
    pub fn contains(&self, raw: u16) -> bool {
        (self.low..=self.high).contains(&raw)
    }
}

/// Calibration for the four pedal channels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PedalCalibration {
    /// Primary accelerator sensor travel.
    pub apps1: AdcSpan,
    /// Secondary accelerator sensor travel (reversed slope).
    pub apps2: AdcSpan,
    /// Front brake pressure sensor travel.
    pub front_brake: AdcSpan,
    /// Rear brake pressure sensor travel.
    pub rear_brake: AdcSpan,
    /// Electrical window both accelerator sensors must stay within.
    pub apps_valid: ValidityWindow,
    /// Raw brake reading above which the brake counts as pressed.
    pub brake_pressed_raw: u16,
    /// Canonical full-scale value for scaled pedal positions.
    pub canonical_max: i32,
}

impl Default for PedalCalibration {
    fn default() -> Self {
        Self {
            apps1: AdcSpan::new(400, 3700),
            apps2: AdcSpan::new(400, 3700),
            front_brake: AdcSpan::new(400, 3700),
            rear_brake: AdcSpan::new(400, 3700),
            apps_valid: ValidityWindow {
                low: 200,
                high: 3900,
            },
            brake_pressed_raw: 1000,
            canonical_max: DEFAULT_CANONICAL_MAX,
        }
    }
}

impl PedalCalibration {
    /// Set the canonical full-scale value.
    #[must_use]
    pub fn with_canonical_max(mut self, canonical_max: i32) -> Self {
        self.canonical_max = canonical_max;
        self
    }

    /// Set the brake-pressed threshold.
    #[must_use]
    pub fn with_brake_pressed_raw(mut self, raw: u16) -> Self {
        self.brake_pressed_raw = raw;
        self
    }

    /// Validate the calibration.
    ///
    /// # Errors
    ///
    /// Returns [`PlausibilityError::InvalidCalibration`] if a span is empty or
    /// exceeds the ADC range, if the validity window does not cover both
    /// accelerator spans, or if the canonical range is not positive.
    pub fn validate(&self) -> PlausibilityResult<()> {
        let spans = [
            ("apps1", self.apps1),
            ("apps2", self.apps2),
            ("front_brake", self.front_brake),
            ("rear_brake", self.rear_brake),
        ];
        for (name, span) in spans {
            if span.min >= span.max {
                return Err(PlausibilityError::invalid_calibration(format!(
                    "{name} span {}..{} is empty",
                    span.min, span.max
                )));
            }
            if span.max > ADC_FULL_SCALE {
                return Err(PlausibilityError::invalid_calibration(format!(
                    "{name} span exceeds ADC full scale {ADC_FULL_SCALE}"
                )));
            }
        }

        if self.apps_valid.low >= self.apps_valid.high {
            return Err(PlausibilityError::invalid_calibration(
                "apps validity window is empty",
            ));
        }
        for (name, span) in [("apps1", self.apps1), ("apps2", self.apps2)] {
            if !self.apps_valid.contains(span.min) || !self.apps_valid.contains(span.max) {
                return Err(PlausibilityError::invalid_calibration(format!(
                    "{name} span lies outside the validity window"
                )));
            }
        }

        if self.canonical_max <= 0 {
            return Err(PlausibilityError::invalid_calibration(
                "canonical_max must be positive",
            ));
        }
        Ok(())
    }
}

/// One acquisition of every pedal input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawPedalSample {
    /// Primary accelerator sensor, ADC counts.
    pub apps1: u16,
    /// Secondary accelerator sensor, ADC counts.
    pub apps2: u16,
    /// Front brake pressure, ADC counts.
    pub front_brake: u16,
    /// Rear brake pressure, ADC counts.
    pub rear_brake: u16,
    /// Hardware brake-circuit-valid line.
    pub brake_circuit_valid: bool,
}

/// Acquisition collaborator supplying raw pedal readings.
pub trait PedalSensors {
    /// Read every pedal channel once.
    fn sample(&mut self) -> RawPedalSample;
}

/// A fixed sample always reads back the same values.
impl PedalSensors for RawPedalSample {
    fn sample(&mut self) -> RawPedalSample {
        *self
    }
}

/// A raw reading and its scaled value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PedalReading {
    /// ADC counts as acquired.
    pub raw: u16,
    /// Position in `0..=canonical_max`.
    pub scaled: i32,
}

/// Normalized view of one [`RawPedalSample`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PedalReadings {
    /// Primary accelerator.
    pub apps1: PedalReading,
    /// Secondary accelerator, normalized to the same polarity as APPS1.
    pub apps2: PedalReading,
    /// Front brake.
    pub front_brake: PedalReading,
    /// Rear brake.
    pub rear_brake: PedalReading,
    /// APPS1 travel in percent.
    pub apps1_percent: f32,
    /// APPS2 travel in percent, after reversal.
    pub apps2_percent: f32,
    /// Hardware brake-circuit-valid line.
    pub brake_circuit_valid: bool,
}

impl PedalReadings {
    /// Normalize a raw sample against `calibration`.
    #[must_use]
    pub fn from_sample(sample: &RawPedalSample, calibration: &PedalCalibration) -> Self {
        let max = calibration.canonical_max;
        Self {
            apps1: PedalReading {
                raw: sample.apps1,
                scaled: calibration.apps1.scaled(sample.apps1, max, false),
            },
            apps2: PedalReading {
                raw: sample.apps2,
                scaled: calibration.apps2.scaled(sample.apps2, max, true),
            },
            front_brake: PedalReading {
                raw: sample.front_brake,
                scaled: calibration.front_brake.scaled(sample.front_brake, max, false),
            },
            rear_brake: PedalReading {
                raw: sample.rear_brake,
                scaled: calibration.rear_brake.scaled(sample.rear_brake, max, false),
            },
            apps1_percent: calibration.apps1.percent(sample.apps1, false),
            apps2_percent: calibration.apps2.percent(sample.apps2, true),
            brake_circuit_valid: sample.brake_circuit_valid,
        }
    }

    /// Absolute APPS disagreement in percentage points.
    #[must_use]
    pub fn apps_difference(&self) -> f32 {
        (self.apps1_percent - self.apps2_percent).abs()
    }
}
