//! Aggregation and threshold selection benchmarks.
//!
//! Run with: `cargo bench --package ranger-bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use ranger_bench::{DAY_TICKS, synthetic_day};
use ranger_lib::{
    Decimal, RangeBarConfig, aggregate, count_bars, dedupe_timestamps, select_threshold,
};
use std::hint::black_box;

fn aggregate_benchmark(c: &mut Criterion) {
    let ticks = synthetic_day(DAY_TICKS, 42);
    let mut group = c.benchmark_group("aggregate");
    group.throughput(Throughput::Elements(ticks.len() as u64));

    for threshold in [50, 300, 1_000] {
        let plain = RangeBarConfig::new(Decimal::from(threshold)).unwrap();
        let gapped = RangeBarConfig::gapped(Decimal::from(threshold), Decimal::from(5)).unwrap();

        group.bench_with_input(BenchmarkId::new("plain", threshold), &plain, |b, config| {
            b.iter(|| aggregate(black_box(&ticks), config).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("gapped", threshold), &gapped, |b, config| {
            b.iter(|| aggregate(black_box(&ticks), config).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("count", threshold), &plain, |b, config| {
            b.iter(|| count_bars(black_box(&ticks), config).unwrap());
        });
    }

    group.finish();
}

fn dedupe_benchmark(c: &mut Criterion) {
    let ticks = synthetic_day(DAY_TICKS, 7);
    let mut group = c.benchmark_group("dedupe");
    group.throughput(Throughput::Elements(ticks.len() as u64));
    group.bench_function("ticks", |b| {
        b.iter(|| dedupe_timestamps(black_box(ticks.clone())));
    });
    group.finish();
}

fn select_benchmark(c: &mut Criterion) {
    let ticks = synthetic_day(DAY_TICKS, 99);
    let mut group = c.benchmark_group("select_threshold");
    group.sample_size(20);
    group.throughput(Throughput::Elements(ticks.len() as u64));

    for target in [100, 300] {
        group.bench_with_input(BenchmarkId::new("neighbors", target), &target, |b, &target| {
            b.iter(|| {
                select_threshold(
                    black_box(&ticks),
                    Decimal::from(300),
                    target,
                    Decimal::from(50),
                )
                .unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, aggregate_benchmark, dedupe_benchmark, select_benchmark);
criterion_main!(benches);
