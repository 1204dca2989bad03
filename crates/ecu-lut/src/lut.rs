//! Sorted key/value calibration tables with clamped linear interpolation.

use serde::{Deserialize, Serialize};

use crate::error::{LutError, LutResult, Monotonicity};

/// Piecewise-linear curve stored as `(key, value)` pairs.
///
/// A `LookupTable` can only be obtained through a validating constructor, so
/// every instance is non-empty, has strictly increasing keys and holds finite
/// values. Lookups are therefore infallible and allocation free.
///
/// # RT Safety
///
/// `LookupTable::lookup()` is RT-safe:
/// - No heap allocations
/// - O(log n) binary search over keys
/// - No syscalls or I/O
///
/// # Example
///
/// ```
/// use ecu_lut::LookupTable;
///
/// let table = LookupTable::from_pairs(&[(0, 0.0), (100, 1.0)])?;
/// assert!((table.lookup(25) - 0.25).abs() < 1e-6);
/// assert!((table.lookup(-10) - 0.0).abs() < f32::EPSILON);
/// assert!((table.lookup(500) - 1.0).abs() < f32::EPSILON);
/// # Ok::<(), ecu_lut::LutError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct LookupTable {
    entries: Vec<(i32, f32)>,
}

impl LookupTable {
    /// Build a table from owned entries.
    ///
    /// # Errors
    ///
    /// Returns [`LutError::Empty`] for an empty table,
    /// [`LutError::KeysNotIncreasing`] for duplicate or unsorted keys and
    /// [`LutError::NonFiniteValue`] for NaN or infinite values.
    pub fn new(entries: Vec<(i32, f32)>) -> LutResult<Self> {
        if entries.is_empty() {
            return Err(LutError::Empty);
        }

        for (index, pair) in entries.windows(2).enumerate() {
            if let [(previous, _), (key, _)] = *pair {
                if key <= previous {
                    return Err(LutError::KeysNotIncreasing {
                        index: index.saturating_add(1),
                        previous,
                        key,
                    });
                }
            }
        }

        if let Some(&(key, _)) = entries.iter().find(|(_, value)| !value.is_finite()) {
            return Err(LutError::NonFiniteValue { key });
        }

        Ok(Self { entries })
    }

    /// Build a table by copying a slice of entries.
    ///
    /// # Errors
    ///
    /// Same as [`LookupTable::new`].
    pub fn from_pairs(pairs: &[(i32, f32)]) -> LutResult<Self> {
        Self::new(pairs.to_vec())
    }

    /// Evaluate the curve at `key`.
    ///
    /// Keys at or below the first stored key return the first value, keys at
    /// or above the last stored key return the last value, and a key equal
    /// to a stored key returns the stored value unchanged. Anything else is
    /// linearly interpolated between the bracketing entries.
    #[inline]
    #[must_use]
    pub fn lookup(&self, key: i32) -> f32 {
        // First entry whose key is not below `key`.
        let upper = self.entries.partition_point(|&(k, _)| k < key);
        let Some(lower) = upper.checked_sub(1) else {
            return self.first_value();
        };

        match (self.entries.get(lower), self.entries.get(upper)) {
            (_, Some(&(hi_key, hi_value))) if hi_key == key => hi_value,
            (Some(&lo), Some(&hi)) => interpolate(lo, hi, key),
            (Some(&(_, lo_value)), None) => lo_value,
            (None, _) => self.first_value(),
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; tables are never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Smallest stored key.
    #[must_use]
    pub fn min_key(&self) -> i32 {
        self.entries.first().map_or(0, |&(k, _)| k)
    }

    /// Largest stored key.
    #[must_use]
    pub fn max_key(&self) -> i32 {
        self.entries.last().map_or(0, |&(k, _)| k)
    }

    /// Value stored at the smallest key.
    #[must_use]
    pub fn first_value(&self) -> f32 {
        self.entries.first().map_or(0.0, |&(_, v)| v)
    }

    /// Value stored at the largest key.
    #[must_use]
    pub fn last_value(&self) -> f32 {
        self.entries.last().map_or(0.0, |&(_, v)| v)
    }

    /// Borrow the raw entries.
    #[must_use]
    pub fn entries(&self) -> &[(i32, f32)] {
        &self.entries
    }

    /// Iterate over stored keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = i32> + '_ {
        self.entries.iter().map(|&(k, _)| k)
    }

    /// Iterate over `(key, value)` pairs in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, f32)> + '_ {
        self.entries.iter().copied()
    }

    /// Check every value lies in `[min, max]`.
    ///
    /// # Errors
    ///
    /// Returns [`LutError::ValueOutOfRange`] for the first value outside the range.
    pub fn ensure_range(&self, min: f32, max: f32) -> LutResult<()> {
        match self
            .entries
            .iter()
            .find(|(_, value)| !(min..=max).contains(value))
        {
            Some(&(key, value)) => Err(LutError::ValueOutOfRange {
                key,
                value,
                min,
                max,
            }),
            None => Ok(()),
        }
    }

    /// Check the curve never rises as the key grows.
    ///
    /// # Errors
    ///
    /// Returns [`LutError::NotMonotonic`] naming the first rising entry.
    pub fn ensure_non_increasing(&self) -> LutResult<()> {
        self.ensure_direction(Monotonicity::NonIncreasing)
    }

    /// Check the curve never falls as the key grows.
    ///
    /// # Errors
    ///
    /// Returns [`LutError::NotMonotonic`] naming the first falling entry.
    pub fn ensure_non_decreasing(&self) -> LutResult<()> {
        self.ensure_direction(Monotonicity::NonDecreasing)
    }

    fn ensure_direction(&self, expected: Monotonicity) -> LutResult<()> {
        for pair in self.entries.windows(2) {
            if let [(_, previous), (key, value)] = *pair {
                let broken = match expected {
                    Monotonicity::NonDecreasing => value < previous,
                    Monotonicity::NonIncreasing => value > previous,
                };
                if broken {
                    return Err(LutError::NotMonotonic { expected, key });
                }
            }
        }
        Ok(())
    }
}

#[inline]
fn interpolate((lo_key, lo_value): (i32, f32), (hi_key, hi_value): (i32, f32), key: i32) -> f32 {
    let span = f64::from(hi_key) - f64::from(lo_key);
    let offset = f64::from(key) - f64::from(lo_key);
    let lo = f64::from(lo_value);
    let hi = f64::from(hi_value);
    (lo + (hi - lo) * offset / span) as f32
}

/// Evaluate `table` at `key`.
///
/// Free-function form of [`LookupTable::lookup`].
#[inline]
#[must_use]
pub fn lookup(table: &LookupTable, key: i32) -> f32 {
    table.lookup(key)
}

impl Serialize for LookupTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LookupTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let entries: Vec<(i32, f32)> = Vec::deserialize(deserializer)?;
        LookupTable::new(entries).map_err(serde::de::Error::custom)
    }
}
