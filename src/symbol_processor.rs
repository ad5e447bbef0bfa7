//! The closed-loop heart of the demodulator.
//!
//! Consumes differentially-decoded phase samples one at a time, tracks
//! the samples-per-symbol period, selects the symbol instant by
//! fractional interpolation, makes hard decisions, drives the timing
//! loop, feeds the equalizer, runs the sync detector, and emits a
//! 24-dibit-delayed dibit stream.

use std::f64::consts::{PI, TAU};

use crate::config::DqpskConfig;
use crate::delay_line::{DibitDelayLine, PhaseDelayLine};
use crate::dibit::{sync_pattern_dibits, Dibit};
use crate::equalizer::Equalizer;
use crate::interpolator;
use crate::logging::SignalLogger;
use crate::sync_detector::SyncDetector;
use crate::timing_error::timing_error;

#[derive(Debug, Clone)]
pub struct SymbolProcessor {
    nominal_samples_per_symbol: f64,
    observed_samples_per_symbol: f64,
    sample_point: f64,
    previous_phase: Option<f64>,
    noise_threshold: f64,
    obs_gain: f64,
    sc_gain: f64,
    sync_threshold: f64,
    enable_sync_retuning: bool,
    equalizer_n: usize,
    equalizer_step_value: f64,

    /// Rolling 48-bit window of the last 24 hard-decision values.
    /// Tracked as documented state; sync detection itself uses the
    /// phase correlator, not this register.
    sync_shift_register: u64,
    noisy: bool,

    phase_delay: PhaseDelayLine,
    equalizer: Equalizer,
    sync_detector: SyncDetector,
    dibit_delay: DibitDelayLine,

    output: Vec<Dibit>,
}

impl SymbolProcessor {
    pub fn new(config: &DqpskConfig) -> Self {
        let nominal = config.samples_per_symbol();
        Self {
            nominal_samples_per_symbol: nominal,
            observed_samples_per_symbol: nominal,
            sample_point: nominal,
            previous_phase: None,
            noise_threshold: (TAU / nominal) * config.noise_threshold_multiplier,
            obs_gain: config.observed_gain(),
            sc_gain: config.timing_loop_gain,
            sync_threshold: config.sync_threshold,
            enable_sync_retuning: config.enable_sync_retuning,
            equalizer_n: config.equalizer_half_length,
            equalizer_step_value: config.equalizer_step,
            sync_shift_register: 0,
            noisy: false,
            phase_delay: PhaseDelayLine::new(),
            equalizer: Equalizer::new(config.equalizer_half_length, config.equalizer_step),
            sync_detector: SyncDetector::new(),
            dibit_delay: DibitDelayLine::new(),
            output: Vec::new(),
        }
    }

    pub fn nominal_samples_per_symbol(&self) -> f64 {
        self.nominal_samples_per_symbol
    }

    pub fn observed_samples_per_symbol(&self) -> f64 {
        self.observed_samples_per_symbol
    }

    pub fn sync_shift_register(&self) -> u64 {
        self.sync_shift_register
    }

    /// Reset all state to boot-time defaults except the nominal rate.
    pub fn reset(&mut self) {
        let nominal = self.nominal_samples_per_symbol;

        self.observed_samples_per_symbol = nominal;
        self.sample_point = nominal;
        self.previous_phase = None;
        self.sync_shift_register = 0;
        self.noisy = false;
        self.phase_delay = PhaseDelayLine::new();
        self.equalizer = Equalizer::new(self.equalizer_n, self.equalizer_step_value);
        self.sync_detector = SyncDetector::new();
        self.dibit_delay = DibitDelayLine::new();
        self.output.clear();
    }

    /// Drain accumulated output dibits, clearing the internal buffer.
    pub fn drain_output(&mut self) -> Vec<Dibit> {
        std::mem::take(&mut self.output)
    }

    /// Feed one differential phase sample.
    pub fn process_sample(&mut self, phase: f32, mut logger: Option<&mut SignalLogger>) {
        let unwrapped = self.unwrap_and_gate(phase as f64);
        self.phase_delay.push(unwrapped as f32);
        self.sample_point -= 1.0;

        if self.sample_point < 1.0 {
            self.handle_symbol_instant(logger.as_deref_mut());
        }
    }

    fn unwrap_and_gate(&mut self, phase: f64) -> f64 {
        let mut current = phase;
        if let Some(previous) = self.previous_phase {
            let raw_diff = current - previous;
            if raw_diff.abs() > PI {
                if raw_diff > 0.0 {
                    current -= TAU;
                } else {
                    current += TAU;
                }
            }
            let gated_diff = current - previous;
            if gated_diff.abs() > self.noise_threshold {
                self.noisy = true;
            }
        }
        self.previous_phase = Some(current);
        current
    }

    fn handle_symbol_instant(&mut self, logger: Option<&mut SignalLogger>) {
        let mu = self.sample_point.clamp(0.0, 1.0 - f64::EPSILON);
        let window = self.phase_delay.window();
        let interpolated = interpolator::filter(window, 0, mu) as f64;
        let preceding = window[3] as f64;
        let following = window[4] as f64;

        let decision = Dibit::from_phase(interpolated);

        let mut eps = timing_error(decision, preceding, interpolated, following);
        if self.noisy {
            eps = 0.0;
        }

        self.observed_samples_per_symbol += eps * self.obs_gain;
        if !self.observed_samples_per_symbol.is_finite() {
            self.observed_samples_per_symbol = self.nominal_samples_per_symbol;
        }
        let lo = self.nominal_samples_per_symbol * (1.0 - 5e-4);
        let hi = self.nominal_samples_per_symbol * (1.0 + 5e-4);
        self.observed_samples_per_symbol = self.observed_samples_per_symbol.clamp(lo, hi);

        self.sample_point += self.observed_samples_per_symbol + eps * self.sc_gain;

        let (final_decision, phase_for_sync) = if self.noisy {
            self.equalizer.process_no_update(decision, interpolated);
            (decision, interpolated)
        } else {
            let equalized = self.equalizer.process(decision, interpolated);
            (Dibit::from_phase(equalized), equalized)
        };

        self.sync_shift_register =
            ((self.sync_shift_register << 2) | final_decision.value() as u64) & 0xFFFF_FFFF_FFFF;

        let score = self.sync_detector.push_and_correlate(phase_for_sync);

        let emitted = if score > self.sync_threshold {
            if let Some(logger) = logger {
                logger.info("SYNC", format_args!("sync detected, score={score:.2}"));
            }
            let pattern = sync_pattern_dibits();
            self.equalizer.sync_detected(&pattern, self.enable_sync_retuning);
            self.dibit_delay.sync_detected(&pattern)
        } else {
            self.dibit_delay.push_and_pop_oldest(final_decision)
        };

        self.output.push(emitted);
        self.noisy = false;
    }
}
