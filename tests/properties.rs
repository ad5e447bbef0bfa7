//! Property-based tests over the full closed loop.

use dmr_dqpsk_core::config::DqpskConfig;
use dmr_dqpsk_core::symbol_processor::SymbolProcessor;
use proptest::prelude::*;

proptest! {
    /// `observed_samples_per_symbol` never leaves its clamp bounds, for
    /// any sequence of input phases.
    #![proptest_config(ProptestConfig::with_cases(64))]
    #[test]
    fn observed_rate_never_leaves_clamp_bounds(
        raw_phases in prop::collection::vec(-3141i32..3141, 4000..8000)
    ) {
        let config = DqpskConfig::default();
        let nominal = config.samples_per_symbol();
        let mut processor = SymbolProcessor::new(&config);

        let lo = nominal * (1.0 - 5e-4);
        let hi = nominal * (1.0 + 5e-4);

        for raw in raw_phases {
            let phase = raw as f64 / 1000.0; // in (-pi, pi)
            processor.process_sample(phase as f32, None);
            let observed = processor.observed_samples_per_symbol();
            prop_assert!(observed.is_finite());
            prop_assert!(observed >= lo - 1e-9 && observed <= hi + 1e-9);
        }
    }
}

/// Scaled check: a million-sample run with a bounded-amplitude
/// pseudo-random phase stream never pushes the observed rate out of
/// bounds.
#[test]
fn observed_rate_stays_bounded_over_a_long_run() {
    let config = DqpskConfig::default();
    let nominal = config.samples_per_symbol();
    let mut processor = SymbolProcessor::new(&config);

    let lo = nominal * (1.0 - 5e-4);
    let hi = nominal * (1.0 + 5e-4);

    // A deterministic pseudo-random-looking sequence avoids pulling in
    // an RNG dependency purely for test data generation.
    let mut state: u64 = 0x9E3779B97F4A7C15;
    for _ in 0..1_000_000u64 {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let unit = (state >> 11) as f64 / (1u64 << 53) as f64; // [0, 1)
        let phase = (unit * 2.0 - 1.0) * std::f64::consts::PI * 0.3;
        processor.process_sample(phase as f32, None);
        let observed = processor.observed_samples_per_symbol();
        assert!(observed.is_finite());
        assert!(observed >= lo - 1e-9 && observed <= hi + 1e-9);
    }
}

/// Emitted dibits lag their originating symbol instant by at least 24
/// symbol periods. We check this indirectly: feeding fewer than 24
/// symbol instants never produces any output beyond the initial
/// delay-line fill, since nothing but the boot-time fill could have
/// drained yet.
#[test]
fn emission_latency_holds_for_short_runs() {
    let config = DqpskConfig::default();
    let sps = config.samples_per_symbol();
    let mut processor = SymbolProcessor::new(&config);

    // Feed exactly 10 symbol instants worth of samples.
    let samples = (sps * 10.0) as usize;
    for _ in 0..samples {
        processor.process_sample(0.05, None);
    }

    let out = processor.drain_output();
    // Every entry must be the boot fill; no "real" decision could have
    // reached the head of the 24-entry delay line yet.
    assert!(out.iter().all(|d| *d == dmr_dqpsk_core::Dibit::D00Plus1));
}
