//! Correlation-based sync-pattern detector.
//!
//! Cheap enough to run every symbol: a clamp, two writes, and a 24-term
//! dot product against the DMR sync pattern's ideal phases.

use crate::dibit::{sync_pattern_phases, Dibit, SYNC_PATTERN_LEN};

const CLAMP_MIN: f64 = -3.0 * std::f64::consts::FRAC_PI_4; // Dibit::D11Minus3.ideal_phase()
const CLAMP_MAX: f64 = 3.0 * std::f64::consts::FRAC_PI_4; // Dibit::D01Plus3.ideal_phase()

/// Sliding-window correlator over the last 24 (post-equalization)
/// symbol phases.
#[derive(Debug, Clone)]
pub struct SyncDetector {
    ring: [f64; 2 * SYNC_PATTERN_LEN],
    pointer: usize,
    reference: [f64; SYNC_PATTERN_LEN],
}

impl SyncDetector {
    pub fn new() -> Self {
        debug_assert!((CLAMP_MIN - Dibit::D11Minus3.ideal_phase()).abs() < 1e-12);
        debug_assert!((CLAMP_MAX - Dibit::D01Plus3.ideal_phase()).abs() < 1e-12);
        Self {
            ring: [0.0; 2 * SYNC_PATTERN_LEN],
            pointer: 0,
            reference: sync_pattern_phases(),
        }
    }

    /// Insert a phase sample (clamped to the outer constellation points)
    /// and return the correlation score against the sync pattern.
    pub fn push_and_correlate(&mut self, phase: f64) -> f64 {
        let clamped = phase.clamp(CLAMP_MIN, CLAMP_MAX);
        self.ring[self.pointer] = clamped;
        self.ring[self.pointer + SYNC_PATTERN_LEN] = clamped;
        self.pointer = (self.pointer + 1) % SYNC_PATTERN_LEN;

        let window = &self.ring[self.pointer..self.pointer + SYNC_PATTERN_LEN];
        self.reference
            .iter()
            .zip(window.iter())
            .map(|(r, s)| r * s)
            .sum()
    }

    pub fn reset(&mut self) {
        let reference = self.reference;
        *self = Self::new();
        debug_assert_eq!(reference, self.reference);
    }
}

impl Default for SyncDetector {
    fn default() -> Self {
        Self::new()
    }
}
