//! Benchmark runner that outputs a markdown table for the README.
//!
//! Run with: `cargo run --package ranger-bench --bin benchmark_table --release`

use ranger_bench::{BenchmarkResult, DAY_TICKS, format_duration, format_rate, synthetic_day, time_run};
use ranger_lib::{
    Decimal, RangeBarConfig, SearchStrategy, ThresholdSelector, TuneConfig, aggregate,
    dedupe_timestamps,
};

/// Number of iterations per benchmark for statistical significance.
const ITERATIONS: usize = 3;

fn main() {
    println!("ranger aggregation benchmark");
    println!("============================\n");

    let ticks = synthetic_day(DAY_TICKS, 42);
    println!("Synthetic day: {} ticks\n", ticks.len());

    let mut results = Vec::new();
    for threshold in [50, 300, 1_000] {
        let Ok(config) = RangeBarConfig::new(Decimal::from(threshold)) else {
            continue;
        };
        results.push(best_of(&format!("aggregate @ {threshold}"), || {
            time_run("aggregate", &ticks, |ticks| {
                aggregate(ticks, &config).map(|bars| bars.len()).unwrap_or_default()
            })
        }));
    }

    results.push(best_of("aggregate + dedupe @ 300", || {
        time_run("dedupe", &ticks, |ticks| {
            RangeBarConfig::new(Decimal::from(300))
                .ok()
                .and_then(|config| aggregate(ticks, &config).ok())
                .map(|bars| dedupe_timestamps(bars).len())
                .unwrap_or_default()
        })
    }));

    for (label, strategy) in [
        ("select (neighbors)", SearchStrategy::Neighbors),
        ("select (bisect)", SearchStrategy::bisect()),
    ] {
        let Ok(config) = TuneConfig::new(300, Decimal::from(50)) else {
            continue;
        };
        let selector = ThresholdSelector::new(config.with_strategy(strategy));
        results.push(best_of(label, || {
            time_run(label, &ticks, |ticks| {
                selector
                    .probe(ticks, Decimal::from(300), None)
                    .map(|probes| probes.len())
                    .unwrap_or_default()
            })
        }));
    }

    println!("| Operation | Time | Throughput | Output |");
    println!("|-----------|------|------------|--------|");
    for result in &results {
        println!(
            "| {} | {} | {} | {} |",
            result.name,
            format_duration(result.duration),
            format_rate(result.ticks_per_sec()),
            result.bars
        );
    }

    println!("\n### Environment\n");
    println!("- OS: {}", std::env::consts::OS);
    println!("- Arch: {}", std::env::consts::ARCH);
}

/// Runs `bench` several times and keeps the fastest run under `name`.
fn best_of(name: &str, mut bench: impl FnMut() -> BenchmarkResult) -> BenchmarkResult {
    let mut best = bench();
    for _ in 1..ITERATIONS {
        let run = bench();
        if run.duration < best.duration {
            best = run;
        }
    }
    best.name = name.to_string();
    best
}
