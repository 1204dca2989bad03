//! Prelude for convenient imports.
//!
//! ```rust
//! use ecu_lut::prelude::*;
//! ```

pub use crate::{LookupTable, LutError, LutResult, Monotonicity, ScaleTarget, lookup, scale};
