//! Numeric helpers shared by the classifier and the accumulator.
//!
//! Everything here absorbs bad input instead of failing: NaN collapses to
//! zero, out-of-range values clamp, negative durations become zero.

/// Clamp `value` into `[lo, hi]`, mapping NaN to `lo`.
///
/// `f64::clamp` panics when `lo > hi`; this never does. If the bounds are
/// inverted the result is `lo`.
#[inline]
pub fn clamp(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() || value < lo || lo > hi {
        lo
    } else if value > hi {
        hi
    } else {
        value
    }
}

/// Clamp to `[0, 1]`.
#[inline]
pub fn clamp01(value: f64) -> f64 {
    clamp(value, 0.0, 1.0)
}

/// Clamp a signed position to `[-1, 1]`. Non-finite input is treated as
/// centered (0.0), infinities included.
#[inline]
pub fn clamp_signed(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Replace NaN and infinities with 0.0.
#[inline]
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Elapsed milliseconds between two timestamps, floored at zero.
#[inline]
pub fn elapsed_ms(last: Option<i64>, now: i64) -> u64 {
    match last {
        Some(last) => now.saturating_sub(last).max(0) as u64,
        None => 0,
    }
}
