//! Configuration for the DQPSK demodulation core.

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, Result};

/// Session-lifetime configuration for a `DqpskDemodulator`.
///
/// `symbol_rate` and `sample_rate` are immutable mid-session unless
/// preceded by `reset()`. The remaining fields are construction-time
/// tunables that belong on the component, not as globals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DqpskConfig {
    /// Symbols per second. DMR's physical layer runs at 4800.
    pub symbol_rate: u32,
    /// Sample rate of the incoming complex baseband, in Hz.
    pub sample_rate: f64,

    /// Equalizer half-length `N`; filter length is `2N + 1`. DMR uses 12.
    pub equalizer_half_length: usize,
    /// LMS step size for the equalizer's tap update.
    pub equalizer_step: f64,

    /// Symbol-clock loop gain (`SC_GAIN`).
    pub timing_loop_gain: f64,

    /// Correlation score above which the sync detector declares a match.
    pub sync_threshold: f64,
    /// Multiplier applied to the nominal-derived noise threshold.
    pub noise_threshold_multiplier: f64,

    /// Gate the experimental closed-form `sync_detected` retuning.
    /// When `false`, a sync event still injects ground truth into the
    /// delay line and forces the decision-directed `process`/
    /// `process_no_update` path, but skips the aggressive one-shot tap
    /// recompute.
    pub enable_sync_retuning: bool,
}

impl Default for DqpskConfig {
    fn default() -> Self {
        Self {
            symbol_rate: 4800,
            sample_rate: 50_000.0,
            equalizer_half_length: 12,
            equalizer_step: 0.1,
            timing_loop_gain: 0.070,
            sync_threshold: 80.0,
            noise_threshold_multiplier: 1.2,
            enable_sync_retuning: true,
        }
    }
}

impl DqpskConfig {
    /// Nominal samples per symbol, `sample_rate / symbol_rate`.
    pub fn samples_per_symbol(&self) -> f64 {
        self.sample_rate / self.symbol_rate as f64
    }

    /// `OBS_GAIN = 0.05 * SC_GAIN^2`.
    pub fn observed_gain(&self) -> f64 {
        0.05 * self.timing_loop_gain * self.timing_loop_gain
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.symbol_rate == 0 {
            return Err(ConfigError::InvalidSymbolRate {
                rate: self.symbol_rate,
            }
            .into());
        }
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(ConfigError::InvalidSampleRate {
                rate: self.sample_rate,
            }
            .into());
        }
        if self.sample_rate <= self.symbol_rate as f64 * 2.0 {
            return Err(ConfigError::InsufficientSampleRate {
                sample_rate: self.sample_rate,
                symbol_rate: self.symbol_rate,
            }
            .into());
        }
        Ok(())
    }
}
