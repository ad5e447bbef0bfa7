//! Differential demodulator: rotation-from-previous-to-current phase
//! extraction.

use crate::interpolator;
use num_complex::Complex64;

/// Differentially demodulate `batch` samples starting at index 0 of
/// `i`/`q`, reading the "current" rail values via fractional-delay
/// interpolation at `interpolation_offset + x` with fraction `mu`.
///
/// Preconditions: `i.len() == q.len()` and
/// `i.len() >= interpolation_offset + batch + interpolator::TAP_COUNT`.
pub fn demodulate(i: &[f32], q: &[f32], interpolation_offset: usize, mu: f64, batch: usize) -> Vec<f32> {
    debug_assert_eq!(i.len(), q.len());
    let mut out = Vec::with_capacity(batch);
    for x in 0..batch {
        let prev = Complex64::new(i[x] as f64, q[x] as f64);

        let cur_i = interpolator::filter(i, interpolation_offset + x, mu);
        let cur_q = interpolator::filter(q, interpolation_offset + x, mu);
        let cur = Complex64::new(cur_i as f64, cur_q as f64);

        // cur * conj(prev) has real part prev_I*cur_I + prev_Q*cur_Q and
        // imaginary part prev_I*cur_Q - cur_I*prev_Q, matching spec's
        // dI/dQ formulas exactly. `Complex::arg()` is `atan2(im, re)`
        // and returns 0 for the origin, so atan2(0,0) degenerates safely.
        let rotation = cur * prev.conj();
        out.push(rotation.arg() as f32);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::TAU;

    fn padded_iq(len: usize, cycles_per_sample: f64) -> (Vec<f32>, Vec<f32>) {
        let i: Vec<f32> = (0..len)
            .map(|n| (TAU * cycles_per_sample * n as f64).cos() as f32)
            .collect();
        let q: Vec<f32> = (0..len)
            .map(|n| (TAU * cycles_per_sample * n as f64).sin() as f32)
            .collect();
        (i, q)
    }

    #[test]
    fn constant_rotation_yields_constant_differential_phase() {
        // A constant per-sample rotation k produces a constant
        // differential phase of k * samples_per_symbol * 2*pi (mod
        // unwrapping), at mu=0 where the interpolator is identity.
        let samples_per_symbol = 10usize; // integer so mu=0 exactly
        let k = 0.01; // cycles per sample
        let batch = 40;
        let (i, q) = padded_iq(batch + samples_per_symbol + interpolator::TAP_COUNT, k);

        let phases = demodulate(&i, &q, samples_per_symbol - 4, 0.0, batch);

        let expected = (TAU * k * samples_per_symbol as f64 + std::f64::consts::PI)
            .rem_euclid(TAU)
            - std::f64::consts::PI;

        for (n, phase) in phases.iter().enumerate().skip(8) {
            assert_abs_diff_eq!(*phase as f64, expected, epsilon = 0.05);
            let _ = n;
        }
    }

    #[test]
    fn all_zero_input_never_panics_and_returns_zero_phase() {
        let len = 64;
        let i = vec![0.0f32; len];
        let q = vec![0.0f32; len];
        let phases = demodulate(&i, &q, 0, 0.0, 16);
        assert!(phases.iter().all(|&p| p == 0.0));
    }
}
