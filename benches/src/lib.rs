//! Benchmark utilities for ranger.
//!
//! Synthetic tick days and timing helpers shared by the criterion benches
//! and the `benchmark_table` runner.

use std::time::{Duration, Instant};

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use ranger_lib::{Decimal, Tick};

/// Typical tick count of one liquid futures session.
pub const DAY_TICKS: usize = 200_000;

/// Generates a reproducible random-walk day of `len` ticks.
///
/// Prices move on a 5-point grid starting at 15000; up to ten ticks share
/// each wall-clock second so the deduplicator has work to do.
pub fn synthetic_day(len: usize, seed: u64) -> Vec<Tick> {
    let open = session_open();
    let mut state = seed;
    let mut price: i64 = 15_000;

    (0..len)
        .map(|i| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            price += (((state >> 33) % 5) as i64 - 2) * 5;
            let volume = 1 + ((state >> 50) % 20) as i64;
            Tick::new(
                open + TimeDelta::seconds((i / 10) as i64),
                Decimal::from(price),
                Decimal::from(volume),
            )
        })
        .collect()
}

fn session_open() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Result of a single timed run.
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    /// Operation that was timed.
    pub name: String,
    /// Wall-clock duration.
    pub duration: Duration,
    /// Ticks consumed.
    pub ticks: usize,
    /// Bars produced (or the chosen threshold's count for selection).
    pub bars: usize,
}

impl BenchmarkResult {
    /// Ticks processed per second.
    pub fn ticks_per_sec(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.ticks as f64 / secs
        } else {
            0.0
        }
    }
}

/// Times `run` over `ticks`, which returns the number of bars it produced.
pub fn time_run(name: &str, ticks: &[Tick], run: impl FnOnce(&[Tick]) -> usize) -> BenchmarkResult {
    let start = Instant::now();
    let bars = run(ticks);
    BenchmarkResult {
        name: name.to_string(),
        duration: start.elapsed(),
        ticks: ticks.len(),
        bars,
    }
}

/// Format duration in human-readable form.
pub fn format_duration(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms < 1.0 {
        format!("{:.0}µs", ms * 1000.0)
    } else if ms < 1000.0 {
        format!("{ms:.1}ms")
    } else {
        format!("{:.2}s", ms / 1000.0)
    }
}

/// Format a rate as thousands or millions per second.
pub fn format_rate(per_sec: f64) -> String {
    if per_sec >= 1_000_000.0 {
        format!("{:.1}M/s", per_sec / 1_000_000.0)
    } else {
        format!("{:.0}k/s", per_sec / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_day_is_sorted_and_reproducible() {
        let a = synthetic_day(1_000, 7);
        let b = synthetic_day(1_000, 7);
        assert_eq!(a, b);
        assert!(a.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert_eq!(a[9].timestamp, a[0].timestamp);
        assert_ne!(a[10].timestamp, a[0].timestamp);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_micros(250)), "250µs");
        assert_eq!(format_duration(Duration::from_millis(12)), "12.0ms");
        assert_eq!(format_duration(Duration::from_millis(2500)), "2.50s");
    }
}
