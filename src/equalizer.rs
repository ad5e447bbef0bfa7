//! Adaptive LMS equalizer over soft-symbol phases.
//!
//! A length-`2N+1` filter with a fixed unity center tap. Two duplicated
//! rings (`z` for observed phases, `a` for the corresponding ideal-phase
//! ground truth) share one pointer, so a contiguous `2N+1`-wide read
//! never needs a modulo.

use crate::dibit::{Dibit, SYNC_PATTERN_LEN};

#[derive(Debug, Clone)]
pub struct Equalizer {
    /// `2N + 1`.
    length: usize,
    /// `length / 2`, the fixed unity tap's index.
    center: usize,
    z: Vec<f64>,
    a: Vec<f64>,
    q: Vec<f64>,
    pointer: usize,
    step: f64,
}

impl Equalizer {
    /// `n` is the half-length (DMR uses 12); `step` is the LMS step size.
    pub fn new(n: usize, step: f64) -> Self {
        let length = 2 * n + 1;
        let center = length / 2;
        let mut q = vec![0.0; length];
        q[center] = 1.0;
        Self {
            length,
            center,
            z: vec![0.0; 2 * length],
            a: vec![0.0; 2 * length],
            q,
            pointer: 0,
            step,
        }
    }

    fn insert(&mut self, phase: f64, ideal_phase: f64) {
        self.z[self.pointer] = phase;
        self.z[self.pointer + self.length] = phase;
        self.a[self.pointer] = ideal_phase;
        self.a[self.pointer + self.length] = ideal_phase;
        self.pointer = (self.pointer + 1) % self.length;
    }

    /// Advance state and return the equalized phase, updating taps by
    /// the normalized-error LMS rule.
    pub fn process(&mut self, decision: Dibit, phase: f64) -> f64 {
        self.insert(phase, decision.ideal_phase());
        let p = self.pointer;

        let mut y = 0.0;
        for l in 0..self.length {
            y += (self.z[p + l] - self.a[p + l]) * self.q[l];
        }
        if !y.is_finite() {
            y = 0.0;
        }

        let error = self.a[p + self.center] - y;
        for l in 0..self.length {
            if l == self.center {
                continue;
            }
            let regressor = self.z[p + l] - self.a[p + l];
            let mut updated = self.q[l] + 2.0 * self.step * error * regressor;
            if !updated.is_finite() {
                updated = 0.0;
            }
            self.q[l] = updated;
        }

        y
    }

    /// Advance state without updating taps or producing an output — the
    /// noisy-symbol path.
    pub fn process_no_update(&mut self, decision: Dibit, phase: f64) {
        self.insert(phase, decision.ideal_phase());
    }

    /// One-shot closed-form retuning from a confirmed sync pattern.
    /// Requires `2 * n == SYNC_PATTERN_LEN`, i.e. `n == 12`
    /// for DMR — the configuration this crate defaults to.
    pub fn sync_detected(&mut self, true_dibits: &[Dibit; SYNC_PATTERN_LEN], retune_taps: bool) {
        assert_eq!(
            self.length - 1,
            SYNC_PATTERN_LEN,
            "sync_detected requires 2*n == {SYNC_PATTERN_LEN} off-center taps"
        );
        let p = self.pointer;
        let length = self.length;

        // Overwrite the 24 most-recent a[] entries (everything except
        // the single oldest slot) with the confirmed ground truth.
        for (i, d) in true_dibits.iter().enumerate() {
            let logical = (p + 1 + i) % length;
            self.a[logical] = d.ideal_phase();
            self.a[logical + length] = d.ideal_phase();
        }

        if !retune_taps {
            return;
        }

        let tap_error = |z: &[f64], a: &[f64], x: usize| z[p + x] - a[p + x];
        let main_tap_error = tap_error(&self.z, &self.a, self.center);

        for x in 0..length {
            if x == self.center {
                continue;
            }
            let te = tap_error(&self.z, &self.a, x);
            let mut q = if te.abs() < f64::EPSILON {
                0.0
            } else {
                -main_tap_error / SYNC_PATTERN_LEN as f64 / te
            };
            if !q.is_finite() {
                q = 0.0;
            }
            self.q[x] = q;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.center, self.step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn center_tap_starts_at_unity_others_zero() {
        let eq = Equalizer::new(12, 0.1);
        assert_eq!(eq.q[eq.center], 1.0);
        for (i, &tap) in eq.q.iter().enumerate() {
            if i != eq.center {
                assert_eq!(tap, 0.0);
            }
        }
    }

    #[test]
    fn process_on_perfect_symbols_leaves_taps_near_unity_center() {
        let mut eq = Equalizer::new(12, 0.1);
        for _ in 0..100 {
            eq.process(Dibit::D00Plus1, Dibit::D00Plus1.ideal_phase());
        }
        // Zero error at every step means no tap drift away from init.
        assert_abs_diff_eq!(eq.q[eq.center], 1.0, epsilon = 1e-9);
    }

    #[test]
    fn process_no_update_does_not_change_taps() {
        let mut eq = Equalizer::new(12, 0.1);
        let before = eq.q.clone();
        eq.process_no_update(Dibit::D10Minus1, 0.3);
        assert_eq!(eq.q, before);
    }

    #[test]
    fn sync_detected_requires_matching_length() {
        let mut eq = Equalizer::new(3, 0.1); // length 7, only 6 off-center taps
        let pattern = crate::dibit::sync_pattern_dibits();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            eq.sync_detected(&pattern, true);
        }));
        assert!(result.is_err());
    }

    #[test]
    fn non_finite_output_is_guarded_to_zero() {
        let mut eq = Equalizer::new(12, 0.1);
        eq.q[0] = f64::INFINITY;
        let y = eq.process(Dibit::D00Plus1, 0.0);
        assert!(y.is_finite());
    }
}
