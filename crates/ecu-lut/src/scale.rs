//! Fraction-to-integer scaling with round-half-away-from-zero and saturation.

mod sealed {
    pub trait Sealed {}
}

/// Integer types a table fraction can be scaled into.
///
/// Implemented for the widths the control core publishes: duty-cycle bytes,
/// canonical pedal units and inverter current requests.
pub trait ScaleTarget: Copy + sealed::Sealed {
    /// Widen to `f64` without loss.
    fn to_f64(self) -> f64;

    /// Narrow a rounded `f64`, saturating at the type bounds; NaN maps to zero.
    fn saturate_from(value: f64) -> Self;
}

macro_rules! impl_scale_target {
    ($($ty:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl ScaleTarget for $ty {
                #[inline]
                fn to_f64(self) -> f64 {
                    f64::from(self)
                }

                #[inline]
                fn saturate_from(value: f64) -> Self {
                    // Float-to-int `as` saturates and maps NaN to zero.
                    value as $ty
                }
            }
        )*
    };
}

impl_scale_target!(u8, u16, i16, i32);

/// Scale `fraction` of `max` to the nearest integer.
///
/// Halfway cases round away from zero and the result saturates to the
/// range of `T`, so out-of-range fractions clip instead of wrapping.
///
/// ```
/// use ecu_lut::scale;
///
/// assert_eq!(scale(0.33334, 80_000i32), 26_667);
/// assert_eq!(scale(0.05, 255u8), 13);
/// assert_eq!(scale(2.0, 255u8), 255);
/// assert_eq!(scale(-0.5, 255u8), 0);
/// ```
#[inline]
#[must_use]
pub fn scale<T: ScaleTarget>(fraction: f32, max: T) -> T {
    T::saturate_from((f64::from(fraction) * max.to_f64()).round())
}
