//! Fixed-size ring buffers used by the symbol processor.
//!
//! Two shapes appear here: a *duplicated* ring (two back-to-back
//! copies of the same window) so a contiguous read never needs a modulo
//! in the inner loop, and a plain FIFO ring for the dibit output delay.

use crate::dibit::Dibit;
use std::collections::VecDeque;

/// An 8-entry duplicated ring of phase samples feeding the interpolator.
/// Backed by 16 entries so `window()` can hand back 8 contiguous values
/// without wrapping.
#[derive(Debug, Clone)]
pub struct PhaseDelayLine {
    buf: [f32; 16],
    pointer: usize,
}

impl PhaseDelayLine {
    pub const LEN: usize = 8;

    pub fn new() -> Self {
        Self {
            buf: [0.0; 16],
            pointer: 0,
        }
    }

    /// Push a new phase sample, overwriting the oldest entry.
    pub fn push(&mut self, phase: f32) {
        self.buf[self.pointer] = phase;
        self.buf[self.pointer + Self::LEN] = phase;
        self.pointer = (self.pointer + 1) % Self::LEN;
    }

    /// The current 8 contiguous entries, oldest first, suitable for
    /// `interpolator::filter`.
    pub fn window(&self) -> &[f32] {
        &self.buf[self.pointer..self.pointer + Self::LEN]
    }

    /// Pointer into `window()`. The timing-error neighbors are read at
    /// `pointer+3` / `pointer+4` — those indices are into this window,
    /// i.e. `window()[3]` / `window()[4]`.
    pub fn pointer(&self) -> usize {
        self.pointer
    }
}

impl Default for PhaseDelayLine {
    fn default() -> Self {
        Self::new()
    }
}

/// Ring buffer of 24 dibits aligning emitted symbols with the
/// 24-dibit-lagged sync correlator.
#[derive(Debug, Clone)]
pub struct DibitDelayLine {
    ring: VecDeque<Dibit>,
}

impl DibitDelayLine {
    pub const LEN: usize = 24;

    /// A fresh delay line, pre-filled with `Dibit::D00Plus1`: feeding
    /// all-zero samples emits this initial fill.
    pub fn new() -> Self {
        Self {
            ring: std::iter::repeat(Dibit::D00Plus1).take(Self::LEN).collect(),
        }
    }

    /// Insert the current decision, then return the oldest entry —
    /// the normal (non-sync) path.
    pub fn push_and_pop_oldest(&mut self, decision: Dibit) -> Dibit {
        self.ring.push_back(decision);
        self.ring
            .pop_front()
            .expect("delay line is never emptied below capacity")
    }

    /// Overwrite all 24 entries with the confirmed sync pattern and
    /// emit its first dibit — the sync-event path.
    /// Subsequent calls to `push_and_pop_oldest` drain the remaining 23
    /// pattern entries before any newly pushed decision is emitted.
    pub fn sync_detected(&mut self, pattern: &[Dibit; Self::LEN]) -> Dibit {
        self.ring.clear();
        self.ring.extend(pattern.iter().copied());
        self.ring
            .pop_front()
            .expect("pattern has exactly LEN entries")
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for DibitDelayLine {
    fn default() -> Self {
        Self::new()
    }
}
