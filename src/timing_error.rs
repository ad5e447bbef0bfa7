//! Stateless symbol-timing error detector.

use crate::dibit::Dibit;
use std::f64::consts::FRAC_PI_4;

/// Half of the decision region's width; the error detector clamps to
/// `±π/8` so a single noisy symbol cannot kick the loop hard.
const MAX_ERROR: f64 = FRAC_PI_4 / 2.0;

/// Map `(decision, preceding, this, following)` phases to a signed
/// radian timing error.
///
/// `preceding`/`this`/`following` are the interpolated phase samples at
/// the delay-line indices immediately around the symbol instant
/// (`pointer+3`, the interpolated point itself, and `pointer+4`).
///
/// When `preceding == following` exactly there is no detectable sense
/// of rotation to infer a sign from (this only happens on a perfectly
/// flat input, e.g. an idle/all-zero channel) — returning 0 there
/// keeps a signal-free stream from walking the timing loop off
/// nominal one clamp-step at a time.
pub fn timing_error(decision: Dibit, preceding: f64, this: f64, following: f64) -> f64 {
    let ideal = decision.ideal_phase();
    let raw = (ideal - this).clamp(-MAX_ERROR, MAX_ERROR);

    use std::cmp::Ordering;
    match preceding.partial_cmp(&following) {
        Some(Ordering::Less) => raw,
        Some(Ordering::Equal) | None => 0.0,
        Some(Ordering::Greater) => -raw,
    }
}
