use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dmr_dqpsk_core::interpolator;

fn benchmark_filter_scalar(c: &mut Criterion) {
    let samples: Vec<f32> = (0..16).map(|i| (i as f32 * 0.3).sin()).collect();

    c.bench_function("interpolator_filter_mu_zero", |b| {
        b.iter(|| interpolator::filter(black_box(&samples), black_box(0), black_box(0.0)))
    });

    let mut group = c.benchmark_group("interpolator_filter_by_phase");
    for mu in [0.0, 0.125, 0.25, 0.5, 0.75, 0.999] {
        group.bench_with_input(BenchmarkId::from_parameter(mu), &mu, |b, &mu| {
            b.iter(|| interpolator::filter(black_box(&samples), black_box(4), black_box(mu)))
        });
    }
    group.finish();
}

fn benchmark_taps_table_build(c: &mut Criterion) {
    // `taps()` memoizes via OnceLock; this measures first-call cost,
    // which matters once per process lifetime.
    c.bench_function("interpolator_taps_first_access", |b| {
        b.iter(|| black_box(interpolator::taps()))
    });
}

criterion_group!(benches, benchmark_filter_scalar, benchmark_taps_table_build);
criterion_main!(benches);
