//! Demodulator facade: the public entry point.
//!
//! Owns the residual-sample overlap buffer, drives the differential
//! demodulator block-by-block over each arriving batch, and forwards
//! the resulting phase stream to a single `SymbolProcessor`.

use crate::config::DqpskConfig;
use crate::dibit::Dibit;
use crate::differential;
use crate::errors::Result;
use crate::logging::SignalLogger;
use crate::symbol_processor::SymbolProcessor;

/// Block width for the inner vectorized differential-demod loop: the
/// SIMD lane count when the `simd` feature is on, 1 (scalar) otherwise.
#[cfg(feature = "simd")]
const BLOCK_WIDTH: usize = 8;
#[cfg(not(feature = "simd"))]
const BLOCK_WIDTH: usize = 1;

/// The top-level DQPSK demodulator for one logical receive session.
/// Strictly single-threaded: one instance per channel.
pub struct DqpskDemodulator {
    config: DqpskConfig,
    samples_per_symbol: f64,

    mu: f64,
    interpolation_offset: usize,
    overlap: usize,

    i_buf: Vec<f32>,
    q_buf: Vec<f32>,

    processor: SymbolProcessor,
    logger: Option<SignalLogger>,

    last_timestamp_ns: Option<u64>,
}

impl DqpskDemodulator {
    /// Construct a demodulator from a validated configuration.
    /// Construction fails atomically: no partial state on error.
    pub fn new(config: DqpskConfig) -> Result<Self> {
        config.validate()?;

        let samples_per_symbol = config.samples_per_symbol();
        let processor = SymbolProcessor::new(&config);

        let mut demod = Self {
            config,
            samples_per_symbol,
            mu: 0.0,
            interpolation_offset: 0,
            overlap: 0,
            i_buf: Vec::new(),
            q_buf: Vec::new(),
            processor,
            logger: None,
            last_timestamp_ns: None,
        };
        demod.update_observed(samples_per_symbol);
        demod.i_buf = vec![0.0; demod.overlap];
        demod.q_buf = vec![0.0; demod.overlap];
        Ok(demod)
    }

    /// Attach a logger; sync events and loop anomalies are reported
    /// through it from then on.
    pub fn with_logger(mut self, logger: SignalLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn logger(&self) -> Option<&SignalLogger> {
        self.logger.as_ref()
    }

    /// Recompute `samples_per_symbol`, push the new nominal rate into
    /// the symbol processor, and refresh `µ`/`interpolation_offset`/
    /// `overlap`.
    pub fn set_sample_rate(&mut self, sample_rate: f64) -> Result<()> {
        let mut config = self.config.clone();
        config.sample_rate = sample_rate;
        config.validate()?;

        self.samples_per_symbol = config.samples_per_symbol();
        self.processor = SymbolProcessor::new(&config);
        self.config = config;
        self.update_observed(self.samples_per_symbol);
        self.i_buf = vec![0.0; self.overlap];
        self.q_buf = vec![0.0; self.overlap];
        Ok(())
    }

    /// `µ = s − floor(s)`, `interpolation_offset = floor(s) − 4`,
    /// `overlap = floor(s) + 4`.
    fn update_observed(&mut self, s: f64) {
        let floor = s.floor();
        self.mu = s - floor;
        self.interpolation_offset = (floor as isize - 4).max(0) as usize;
        self.overlap = floor as usize + 4;
    }

    /// Feed one batch of I/Q samples; returns the dibits the batch's
    /// tail (delayed by the 24-symbol sync-aligned buffer) made
    /// available.
    pub fn receive(&mut self, i_batch: &[f32], q_batch: &[f32], timestamp_ns: u64) -> Vec<Dibit> {
        debug_assert_eq!(i_batch.len(), q_batch.len());
        if let Some(last) = self.last_timestamp_ns {
            debug_assert!(timestamp_ns >= last, "timestamps must be non-decreasing");
        }
        self.last_timestamp_ns = Some(timestamp_ns);

        let batch = i_batch.len();
        let needed = batch + self.overlap;

        // Step 1: tail `overlap` samples survive at the head; the rest
        // is overwritten by the new batch.
        let mut new_i = vec![0.0f32; needed];
        let mut new_q = vec![0.0f32; needed];
        let carried = self.overlap.min(self.i_buf.len());
        let tail_start = self.i_buf.len() - carried;
        new_i[..carried].copy_from_slice(&self.i_buf[tail_start..]);
        new_q[..carried].copy_from_slice(&self.q_buf[tail_start..]);
        new_i[self.overlap..self.overlap + batch].copy_from_slice(i_batch);
        new_q[self.overlap..self.overlap + batch].copy_from_slice(q_batch);
        self.i_buf = new_i;
        self.q_buf = new_q;

        // Step 2: fixed-width blocks, refreshing mu/offset/overlap from
        // the processor's freshest observed rate after each block.
        let mut x = 0;
        while x < batch {
            let width = BLOCK_WIDTH.min(batch - x);
            if x + self.interpolation_offset + width + crate::interpolator::TAP_COUNT > self.i_buf.len() {
                break;
            }
            // `interpolation_offset` is the fixed gap (in samples)
            // between the "previous" rail read and the "current"
            // interpolated read; slicing from the block's absolute
            // position keeps that gap constant as x advances.
            let phases = differential::demodulate(
                &self.i_buf[x..],
                &self.q_buf[x..],
                self.interpolation_offset,
                self.mu,
                width,
            );
            for phase in phases {
                self.processor.process_sample(phase, self.logger.as_mut());
            }
            x += width;

            let observed = self.processor.observed_samples_per_symbol();
            self.update_observed(observed);
        }

        // Step 3: retrieve and clear accumulated output.
        self.processor.drain_output()
    }

    /// Reset all session state (overlap buffer, symbol processor,
    /// equalizer, delay lines, sync detector, logger) except the
    /// configured `symbol_rate`/`sample_rate`.
    pub fn reset(&mut self) {
        self.processor.reset();
        self.update_observed(self.samples_per_symbol);
        self.i_buf = vec![0.0; self.overlap];
        self.q_buf = vec![0.0; self.overlap];
        self.last_timestamp_ns = None;
        if let Some(logger) = &mut self.logger {
            logger.clear();
        }
    }

    pub fn samples_per_symbol(&self) -> f64 {
        self.samples_per_symbol
    }
}
