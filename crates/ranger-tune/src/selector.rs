//! Threshold search.

use ranger_aggregate::{RangeBarConfig, count_bars};
use ranger_types::{ConfigError, Tick};
use rust_decimal::Decimal;
use tracing::debug;

use crate::{ProbeResult, SearchStrategy, TuneConfig, TuneError};

/// Picks the range threshold for the next day from the current day's ticks.
///
/// Every candidate is measured with the no-gap aggregator, whatever gap
/// policy the bars themselves are built with.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdSelector {
    config: TuneConfig,
}

impl ThresholdSelector {
    /// Creates a selector.
    #[must_use]
    pub const fn new(config: TuneConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration in use.
    #[must_use]
    pub const fn config(&self) -> TuneConfig {
        self.config
    }

    /// Counts bars for every candidate threshold.
    ///
    /// `known_count` is the bar count already on record for `previous`; when
    /// given, `previous` is not re-aggregated. Non-positive candidates are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if `previous <= 0` or the ticks are not in time order.
    pub fn probe(
        &self,
        ticks: &[Tick],
        previous: Decimal,
        known_count: Option<usize>,
    ) -> Result<ProbeResult, TuneError> {
        if previous <= Decimal::ZERO {
            return Err(ConfigError::NonPositiveThreshold(previous).into());
        }

        let step = self.config.step();
        let mut result = ProbeResult::new();
        if let Some(bars) = known_count {
            result.insert(previous, bars);
        }
        for candidate in [previous, previous - step, previous + step] {
            measure(ticks, candidate, &mut result)?;
        }

        if let SearchStrategy::Bisect { max_probes } = self.config.strategy() {
            self.bisect(ticks, previous, max_probes, &mut result)?;
        }
        Ok(result)
    }

    /// Returns the candidate whose bar count is closest to the target.
    ///
    /// Exact ties go to the smaller threshold.
    ///
    /// # Errors
    ///
    /// Returns an error if `previous <= 0` or the ticks are not in time order.
    pub fn select(
        &self,
        ticks: &[Tick],
        previous: Decimal,
        known_count: Option<usize>,
    ) -> Result<Decimal, TuneError> {
        let result = self.probe(ticks, previous, known_count)?;
        let chosen = result.best(self.config.target_bars()).unwrap_or(previous);

        debug!(
            ticks = ticks.len(),
            previous = %previous,
            chosen = %chosen,
            target = self.config.target_bars(),
            probes = result.len(),
            bars = result.get(chosen).unwrap_or_default(),
            "selected threshold"
        );
        Ok(chosen)
    }

    /// Binary search for the smallest step multiple whose bar count does not
    /// exceed the target. Both sides of that boundary end up probed.
    fn bisect(
        &self,
        ticks: &[Tick],
        previous: Decimal,
        max_probes: u32,
        result: &mut ProbeResult,
    ) -> Result<(), TuneError> {
        let step = self.config.step();
        let target = self.config.target_bars();
        let mut lo = Decimal::ONE;
        let two = Decimal::from(2);
        let mut hi = (previous / step).ceil() * two;
        let mut probes = 0;

        while lo < hi && probes < max_probes {
            let mid = ((lo + hi) / two).floor();
            let bars = measure(ticks, mid * step, result)?;
            probes += 1;
            if bars > target {
                lo = mid + Decimal::ONE;
            } else {
                hi = mid;
            }
        }
        if probes < max_probes {
            measure(ticks, lo * step, result)?;
        }
        Ok(())
    }
}

/// Returns the no-gap bar count for `threshold`, probing at most once.
fn measure(
    ticks: &[Tick],
    threshold: Decimal,
    result: &mut ProbeResult,
) -> Result<usize, TuneError> {
    if let Some(bars) = result.get(threshold) {
        return Ok(bars);
    }
    if threshold <= Decimal::ZERO {
        return Ok(0);
    }
    let bars = count_bars(ticks, &RangeBarConfig::new(threshold)?)?;
    result.insert(threshold, bars);
    Ok(bars)
}

/// Picks the next day's threshold with the default neighbour search.
///
/// Candidates are `previous` and `previous ± step`; the one whose bar count
/// over `ticks` is closest to `target_bars` wins, ties going to the smaller
/// threshold.
///
/// # Errors
///
/// Returns an error if `target_bars == 0`, `step <= 0`, `previous <= 0`, or
/// the ticks are not in time order.
pub fn select_threshold(
    ticks: &[Tick],
    previous: Decimal,
    target_bars: usize,
    step: Decimal,
) -> Result<Decimal, TuneError> {
    let config = TuneConfig::new(target_bars, step)?;
    ThresholdSelector::new(config).select(ticks, previous, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};
    use ranger_aggregate::AggregateError;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap()
    }

    /// Prices 0, 1, 2, ... one second apart. A threshold `t` closes a bar
    /// every `t + 1` ticks, so `n` ticks give `ceil(n / (t + 1))` bars.
    fn create_test_ramp(n: usize) -> Vec<Tick> {
        (0..n)
            .map(|i| {
                Tick::new(
                    base() + TimeDelta::seconds(i as i64),
                    Decimal::from(i as u64),
                    Decimal::ONE,
                )
            })
            .collect()
    }

    fn d(value: i64) -> Decimal {
        Decimal::from(value)
    }

    #[test]
    fn test_probe_counts_neighbours() {
        let ticks = create_test_ramp(3030);
        let selector = ThresholdSelector::new(TuneConfig::new(30, d(50)).unwrap());
        let result = selector.probe(&ticks, d(100), None).unwrap();

        let counts: Vec<_> = result.iter().collect();
        assert_eq!(counts, vec![(d(50), 60), (d(100), 30), (d(150), 21)]);
    }

    #[test]
    fn test_select_neighbours() {
        let ticks = create_test_ramp(3030);
        assert_eq!(select_threshold(&ticks, d(100), 30, d(50)).unwrap(), d(100));
        assert_eq!(select_threshold(&ticks, d(100), 25, d(50)).unwrap(), d(150));
        assert_eq!(select_threshold(&ticks, d(100), 60, d(50)).unwrap(), d(50));
        // Far outside the reachable range the nearest neighbour still wins.
        assert_eq!(select_threshold(&ticks, d(100), 1, d(50)).unwrap(), d(150));
    }

    #[test]
    fn test_known_count_is_used() {
        let ticks = create_test_ramp(3030);
        let selector = ThresholdSelector::new(TuneConfig::new(25, d(50)).unwrap());

        let result = selector.probe(&ticks, d(100), Some(25)).unwrap();
        assert_eq!(result.get(d(100)), Some(25));
        assert_eq!(selector.select(&ticks, d(100), Some(25)).unwrap(), d(100));
    }

    #[test]
    fn test_non_positive_candidates_dropped() {
        let ticks = create_test_ramp(500);
        let selector = ThresholdSelector::new(TuneConfig::new(10, d(50)).unwrap());
        let result = selector.probe(&ticks, d(50), None).unwrap();

        assert_eq!(result.len(), 2);
        assert!(!result.contains(Decimal::ZERO));
    }

    #[test]
    fn test_rejects_invalid_inputs() {
        let ticks = create_test_ramp(10);
        assert_eq!(
            select_threshold(&ticks, Decimal::ZERO, 300, d(50)),
            Err(TuneError::Config(ConfigError::NonPositiveThreshold(
                Decimal::ZERO
            )))
        );
        assert_eq!(
            select_threshold(&ticks, d(300), 0, d(50)),
            Err(TuneError::Config(ConfigError::ZeroTarget))
        );
        assert_eq!(
            select_threshold(&ticks, d(300), 300, Decimal::ZERO),
            Err(TuneError::Config(ConfigError::NonPositiveStep(Decimal::ZERO)))
        );
    }

    #[test]
    fn test_unsorted_ticks() {
        let mut ticks = create_test_ramp(10);
        ticks.swap(3, 4);
        let err = select_threshold(&ticks, d(2), 3, d(1)).unwrap_err();
        assert!(matches!(
            err,
            TuneError::Aggregate(AggregateError::UnsortedTicks { index: 4, .. })
        ));
    }

    #[test]
    fn test_empty_day_picks_smallest_candidate() {
        // Every candidate yields zero bars; the tie goes to the smallest.
        assert_eq!(select_threshold(&[], d(300), 300, d(50)).unwrap(), d(250));
    }

    #[test]
    fn test_bisect_reaches_beyond_neighbours() {
        let ticks = create_test_ramp(3030);
        let neighbours = TuneConfig::new(20, d(10)).unwrap();
        let bisect = neighbours.with_strategy(SearchStrategy::bisect());

        // Neighbours of 100 give 34, 30 and 28 bars.
        let nearby = ThresholdSelector::new(neighbours);
        assert_eq!(nearby.select(&ticks, d(100), None).unwrap(), d(110));

        // 150 gives 21 bars and 160 gives 19; the smaller wins the tie.
        let wide = ThresholdSelector::new(bisect);
        let result = wide.probe(&ticks, d(100), None).unwrap();
        assert_eq!(result.get(d(150)), Some(21));
        assert_eq!(result.get(d(160)), Some(19));
        assert_eq!(wide.select(&ticks, d(100), None).unwrap(), d(150));
    }

    #[test]
    fn test_bisect_respects_probe_budget() {
        let ticks = create_test_ramp(3030);
        let config = TuneConfig::new(20, d(10))
            .unwrap()
            .with_strategy(SearchStrategy::Bisect { max_probes: 1 });
        let result = ThresholdSelector::new(config)
            .probe(&ticks, d(100), None)
            .unwrap();

        // Three neighbours; the single bisection probe lands on 100 again.
        assert_eq!(result.len(), 3);
    }
}
