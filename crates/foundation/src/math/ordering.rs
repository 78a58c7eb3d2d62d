//! Deterministic float comparisons.
//!
//! Nearest-marker scans compare distances that can legitimately tie or, with
//! malformed input, be NaN. Everything here gives those comparisons a single
//! well-defined answer.

use core::cmp::Ordering;

/// Canonicalize a floating-point value for deterministic ordering.
///
/// Rules:
/// - `-0.0` becomes `0.0`
/// - all NaNs become a single canonical NaN
pub fn canonical_f64(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

/// Deterministic total ordering for floats. Canonical NaN sorts after `+inf`.
pub fn stable_total_cmp_f64(a: f64, b: f64) -> Ordering {
    canonical_f64(a).total_cmp(&canonical_f64(b))
}

/// `true` only when `candidate` is strictly smaller than `best`.
///
/// Equal values return `false`, so a forward scan keeps the first minimum it saw.
#[inline]
pub fn strictly_less(candidate: f64, best: f64) -> bool {
    stable_total_cmp_f64(candidate, best).is_lt()
}

/// Absolute-tolerance comparison used by geometry tests and callers that
/// snap near-equal values.
#[inline]
pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}
