//! Error types for modifier construction and value computation.
//!
//! All failures in this crate are represented by the `NumericError` enum.
//! Errors are unrecoverable locally: construction either succeeds or fails
//! before any state is mutated, and a failed recomputation leaves the
//! owning [`Numeric`](crate::Numeric) dirty with its previous cache intact.

use thiserror::Error;

/// Errors that can occur while building modifiers or computing values.
///
/// # Examples
///
/// ```rust
/// use nummod::{Modifier, FractionMode, NumericError, TagSet};
///
/// let err = Modifier::fraction(1, 0, FractionMode::Override, TagSet::new(), "broken", 1)
///     .unwrap_err();
/// assert!(matches!(err, NumericError::InvalidArgument(_)));
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NumericError {
    /// A float failed fixed-point validation.
    ///
    /// Raised for NaN, positive/negative infinity, or a magnitude that
    /// would overflow the scaled integer range. Always raised before any
    /// state is mutated.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// A modifier was constructed with malformed parameters.
    ///
    /// Covers a zero denominator on a fraction, a non-positive stack
    /// count, and an empty name.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An intermediate result left the representable range mid-computation.
    ///
    /// Raised when a power or multiplication produces a non-finite value
    /// or exceeds the fixed-point integer range. The computation aborts;
    /// nothing is silently wrapped or truncated.
    #[error("arithmetic overflow in {0}")]
    ArithmeticOverflow(&'static str),

    /// A custom modifier carried no transform.
    ///
    /// Unreachable through the provided constructors, which always
    /// populate exactly one transform.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
}
