//! Calibration lookup tables for the drive-train ECU.
//!
//! Every table-driven calculation in the control core goes through this
//! crate: torque shaping, thermal derating and cooling duty all evaluate a
//! [`LookupTable`] and turn the resulting fraction into an integer command
//! with [`scale`].
//!
//! # Overview
//!
//! - [`LookupTable`]: sorted `(key, value)` pairs, validated on construction
//! - [`lookup`]: clamped piecewise-linear evaluation, exact on stored keys
//! - [`scale`]: fraction of a maximum, rounded half away from zero and saturated
//!
//! # RT Safety
//!
//! Construction validates and allocates once. After that, `lookup` and
//! `scale` are pure functions with bounded execution time.
//!
//! # Example
//!
//! ```
//! use ecu_lut::{LookupTable, scale};
//!
//! let fan = LookupTable::from_pairs(&[(20, 0.0), (25, 0.05), (30, 0.15)])?;
//! let duty: u8 = scale(fan.lookup(25), 255);
//! assert_eq!(duty, 13);
//! # Ok::<(), ecu_lut::LutError>(())
//! ```

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod lut;
pub mod prelude;
pub mod scale;

pub use error::{LutError, LutResult, Monotonicity};
pub use lut::{LookupTable, lookup};
pub use scale::{ScaleTarget, scale};
