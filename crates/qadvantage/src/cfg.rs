//! Numeric floors and ceilings shared across modules (internal).
//!
//! Policy
//! - Defaults are fixed constants; call sites that need different values take
//!   a small config struct (`MappingCfg`, `BisectCfg`) instead.

/// Smallest qubit count handed to consumers; keeps `log10(q)` finite.
pub const MIN_POSITIVE_Q: f64 = 1e-6;
/// `log10(MIN_POSITIVE_Q)`.
pub const MIN_LOG10_Q: f64 = -6.0;
/// Stand-in for values that overflowed `f64` during mapping evaluation.
pub const DEFAULT_CLAMP: f64 = 1e300;
/// Upper end of the problem-size search, as log10 of the problem size.
pub const SIZE_HORIZON_LOG10: f64 = 300.0;

/// Deepest nesting the expression parser accepts, and the tallest tree it builds.
pub const MAX_EXPR_DEPTH: usize = 256;

/// Replace non-finite values by `fallback`.
#[inline]
pub(crate) fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}
