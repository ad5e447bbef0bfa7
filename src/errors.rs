//! Error types for the DQPSK demodulation core.

use thiserror::Error;

/// Top-level error type for core operations.
///
/// The core never panics in correct use and never returns an
/// error from the streaming `receive` path — the only fallible entry
/// points are configuration at session start.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Configuration errors raised at session construction or `set_sample_rate`.
///
/// Construction fails atomically: no partial `DqpskDemodulator` state is
/// created when validation fails.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("invalid sample rate: {rate} Hz (must be finite and > 0)")]
    InvalidSampleRate { rate: f64 },

    #[error("invalid symbol rate: {rate} symbols/s (must be > 0)")]
    InvalidSymbolRate { rate: u32 },

    #[error(
        "sample rate {sample_rate} Hz is not enough for symbol rate {symbol_rate} symbols/s \
         (need sample_rate > symbol_rate * 2)"
    )]
    InsufficientSampleRate { sample_rate: f64, symbol_rate: u32 },
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
