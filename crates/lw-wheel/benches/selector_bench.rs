//! Spin Engine Benchmarks
//!
//! Benchmarks for the hot paths: weighted selection, target computation, easing.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use lw_wheel::{
    RandomSource, RngSource, Segment, SegmentCatalog, SpinEasing, TargetRequest, WeightedSelector,
    compute_target,
};

const SEGMENT_COUNTS: &[usize] = &[2, 9, 64, 1024];

fn uniform_catalog(count: usize) -> SegmentCatalog {
    let segments = (0..count)
        .map(|i| Segment::prize(i as u32 + 1, format!("Prize {i}"), 1.0))
        .collect();
    SegmentCatalog::new(segments).expect("valid catalog")
}

/// Benchmark weighted selection
fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("select");
    group.throughput(Throughput::Elements(1));

    for &count in SEGMENT_COUNTS {
        let catalog = uniform_catalog(count);
        let selector = WeightedSelector::for_catalog(&catalog).expect("selector");
        let mut rng = RngSource::seeded(42);

        group.bench_with_input(BenchmarkId::new("draw", count), &count, |b, _| {
            b.iter(|| black_box(selector.select(rng.next_unit())))
        });
    }

    let lucky = SegmentCatalog::lucky_spin();
    group.bench_function("build_lucky_spin", |b| {
        b.iter(|| black_box(WeightedSelector::for_catalog(&lucky)))
    });

    group.finish();
}

/// Benchmark target computation
fn bench_target(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_target");

    for &turns in &[0u32, 15] {
        let request = TargetRequest::new(6, 9, 11_260.0, turns, 0.13);
        group.bench_with_input(BenchmarkId::new("turns", turns), &request, |b, req| {
            b.iter(|| black_box(compute_target(black_box(req))))
        });
    }

    group.finish();
}

/// Benchmark easing evaluation
fn bench_easing(c: &mut Criterion) {
    let mut group = c.benchmark_group("easing");

    for easing in [
        SpinEasing::dramatic(),
        SpinEasing::EaseInOutCubic,
        SpinEasing::EaseOutQuart,
        SpinEasing::Linear,
    ] {
        group.bench_with_input(
            BenchmarkId::new("evaluate", easing.name()),
            &easing,
            |b, easing| {
                b.iter(|| {
                    let mut acc = 0.0;
                    for i in 0..=100 {
                        acc += easing.evaluate(i as f64 / 100.0);
                    }
                    black_box(acc)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_select, bench_target, bench_easing);
criterion_main!(benches);
