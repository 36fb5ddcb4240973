//! Fixed-point conversion and validation.
//!
//! Values are stored as `i64` integers scaled by 10,000: the external value
//! 1.5 is the raw value 15,000. All arithmetic on the raw form stays in the
//! integer domain, so the same inputs produce bit-identical results on every
//! platform. Floats only appear at the conversion boundary and are validated
//! there: NaN, infinity, and magnitudes that would overflow after scaling
//! are rejected, never clamped.
//!
//! Conversions truncate toward zero rather than round; callers that need
//! rounding do it before converting.

use crate::error::NumericError;

/// Scale factor: raw value 10,000 represents 1.0.
pub const SCALE: i64 = 10_000;

/// Raw representation of 1.0.
pub const ONE: i64 = SCALE;

/// Convert an external float to the raw scaled form.
///
/// Fails with [`NumericError::InvalidValue`] on NaN, positive or negative
/// infinity, or a magnitude that does not fit `i64` after scaling. The
/// fractional part beyond the scale is truncated, not rounded.
///
/// # Examples
///
/// ```rust
/// use nummod::fixed;
///
/// assert_eq!(fixed::from_f64(1.5).unwrap(), 15_000);
/// assert_eq!(fixed::from_f64(-0.25).unwrap(), -2_500);
/// assert!(fixed::from_f64(f64::NAN).is_err());
/// assert!(fixed::from_f64(f64::INFINITY).is_err());
/// assert!(fixed::from_f64(1.0e30).is_err());
/// ```
pub fn from_f64(value: f64) -> Result<i64, NumericError> {
    checked_from_f64(value).ok_or_else(|| NumericError::InvalidValue(format!("{value}")))
}

/// Convert an external integer to the raw scaled form.
///
/// No float validation is involved, but the scaling multiplication is still
/// checked: values beyond `i64::MAX / 10_000` in magnitude fail with
/// [`NumericError::InvalidValue`].
///
/// # Examples
///
/// ```rust
/// use nummod::fixed;
///
/// assert_eq!(fixed::from_int(100).unwrap(), 1_000_000);
/// assert!(fixed::from_int(i64::MAX / 2).is_err());
/// ```
pub fn from_int(value: i64) -> Result<i64, NumericError> {
    value
        .checked_mul(SCALE)
        .ok_or_else(|| NumericError::InvalidValue(format!("{value} overflows when scaled")))
}

/// Convert a raw scaled value back to an external float.
pub fn to_f64(raw: i64) -> f64 {
    raw as f64 / SCALE as f64
}

/// Convert a raw scaled value to an external integer, truncating toward zero.
///
/// # Examples
///
/// ```rust
/// use nummod::fixed;
///
/// assert_eq!(fixed::to_int(15_000), 1);
/// assert_eq!(fixed::to_int(-15_000), -1);
/// assert_eq!(fixed::to_int(9_999), 0);
/// ```
pub fn to_int(raw: i64) -> i64 {
    raw / SCALE
}

/// Scale and truncate a float, or `None` when it is non-finite or out of
/// range. Shared by the construction path (which reports `InvalidValue`)
/// and the computation path (which reports `ArithmeticOverflow`).
pub(crate) fn checked_from_f64(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    let scaled = value * SCALE as f64;
    // i64::MAX as f64 rounds up to 2^63, which is itself unrepresentable,
    // so the boundary comparisons must be inclusive.
    if scaled >= i64::MAX as f64 || scaled <= i64::MIN as f64 {
        return None;
    }
    Some(scaled as i64)
}

/// Range-check an f64 that is already in the raw scaled domain.
pub(crate) fn checked_raw_f64(raw: f64) -> Option<i64> {
    if !raw.is_finite() {
        return None;
    }
    if raw >= i64::MAX as f64 || raw <= i64::MIN as f64 {
        return None;
    }
    Some(raw as i64)
}
