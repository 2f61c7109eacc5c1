//! Streaming tick-to-range-bar aggregation.

use chrono::{DateTime, Utc};
use ranger_types::{Tick, first_unsorted};
use rust_decimal::Decimal;
use tracing::debug;

use crate::{AggregateError, RangeBar, RangeBarConfig};

/// Streaming range-bar aggregator.
///
/// A bar closes on the tick that stretches its high-low spread to the
/// configured threshold. Each aggregator owns its state, so independent tick
/// sequences (one per trading day, for example) can be aggregated
/// concurrently and their bars concatenated afterwards.
#[derive(Debug)]
pub struct RangeBarAggregator {
    config: RangeBarConfig,
    current_bar: Option<BarBuilder>,
    last_timestamp: Option<DateTime<Utc>>,
    ticks_seen: usize,
}

impl RangeBarAggregator {
    /// Creates a new aggregator for the given configuration.
    #[must_use]
    pub const fn new(config: RangeBarConfig) -> Self {
        Self {
            config,
            current_bar: None,
            last_timestamp: None,
            ticks_seen: 0,
        }
    }

    /// Returns the configuration in use.
    #[must_use]
    pub const fn config(&self) -> RangeBarConfig {
        self.config
    }

    /// Returns the number of ticks processed so far.
    #[must_use]
    pub const fn ticks_seen(&self) -> usize {
        self.ticks_seen
    }

    /// Processes a tick, potentially emitting a completed bar.
    ///
    /// Returns `Ok(Some(bar))` when this tick closes a bar.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError::UnsortedTicks`] if the tick is older than the
    /// previous one. The aggregator state is left unchanged in that case.
    pub fn process(&mut self, tick: Tick) -> Result<Option<RangeBar>, AggregateError> {
        if let Some(previous) = self.last_timestamp
            && tick.timestamp < previous
        {
            return Err(AggregateError::UnsortedTicks {
                index: self.ticks_seen,
                previous,
                current: tick.timestamp,
            });
        }
        self.last_timestamp = Some(tick.timestamp);
        self.ticks_seen += 1;
        Ok(self.advance(&tick))
    }

    /// Returns the bar currently being built, without closing it.
    #[must_use]
    pub fn current_bar(&self) -> Option<RangeBar> {
        self.current_bar
            .as_ref()
            .and_then(|b| b.snapshot(self.config.threshold()))
    }

    /// Finishes aggregation, returning the remaining partial bar.
    ///
    /// A gap-mode bar that was opened synthetically but never saw a tick is
    /// dropped, since it has no traded price to close at.
    #[must_use]
    pub fn finish(self) -> Option<RangeBar> {
        let threshold = self.config.threshold();
        self.current_bar.and_then(|b| b.snapshot(threshold))
    }

    fn advance(&mut self, tick: &Tick) -> Option<RangeBar> {
        let Some(mut builder) = self.current_bar.take() else {
            self.current_bar = Some(BarBuilder::new(tick));
            return None;
        };

        builder.update(tick);
        let threshold = self.config.threshold();
        if builder.range() < threshold {
            self.current_bar = Some(builder);
            return None;
        }

        let bar = builder.finish(threshold);
        // In gap mode the closing tick is spent; the next bar opens one
        // increment past it at the same instant.
        self.current_bar = self
            .config
            .gap()
            .next_open(&bar)
            .map(|open| BarBuilder::synthetic(tick.timestamp, open));
        Some(bar)
    }
}

/// Aggregates an ordered tick sequence into range bars.
///
/// The final bar may be partial (its range below the threshold).
///
/// # Errors
///
/// Returns [`AggregateError::UnsortedTicks`] if timestamps decrease anywhere
/// in the input. Ordering is checked before aggregation, so no bars are
/// produced for invalid input.
pub fn aggregate(ticks: &[Tick], config: &RangeBarConfig) -> Result<Vec<RangeBar>, AggregateError> {
    ensure_sorted(ticks)?;

    let mut aggregator = RangeBarAggregator::new(*config);
    let mut bars = Vec::new();
    for tick in ticks {
        if let Some(bar) = aggregator.advance(tick) {
            bars.push(bar);
        }
    }
    bars.extend(aggregator.finish());

    debug!(
        ticks = ticks.len(),
        bars = bars.len(),
        threshold = %config.threshold(),
        gapped = config.gap().is_gapped(),
        "aggregated tick sequence"
    );
    Ok(bars)
}

/// Returns how many bars [`aggregate`] would produce, without keeping them.
///
/// # Errors
///
/// Returns [`AggregateError::UnsortedTicks`] if timestamps decrease.
pub fn count_bars(ticks: &[Tick], config: &RangeBarConfig) -> Result<usize, AggregateError> {
    ensure_sorted(ticks)?;

    let mut aggregator = RangeBarAggregator::new(*config);
    let closed = ticks
        .iter()
        .filter(|tick| aggregator.advance(tick).is_some())
        .count();
    Ok(closed + usize::from(aggregator.finish().is_some()))
}

fn ensure_sorted(ticks: &[Tick]) -> Result<(), AggregateError> {
    match first_unsorted(ticks) {
        Some(index) => Err(AggregateError::UnsortedTicks {
            index,
            previous: ticks[index - 1].timestamp,
            current: ticks[index].timestamp,
        }),
        None => Ok(()),
    }
}

/// Builder for the bar currently open.
#[derive(Debug)]
struct BarBuilder {
    open_time: DateTime<Utc>,
    open: Decimal,
    high: Decimal,
    low: Decimal,
    close: Decimal,
    volume: Decimal,
    tick_count: u32,
}

impl BarBuilder {
    /// Opens a bar at the tick's own price.
    const fn new(tick: &Tick) -> Self {
        Self {
            open_time: tick.timestamp,
            open: tick.price,
            high: tick.price,
            low: tick.price,
            close: tick.price,
            volume: tick.volume,
            tick_count: 1,
        }
    }

    /// Opens a gap bar at a synthetic price with no traded volume.
    const fn synthetic(open_time: DateTime<Utc>, price: Decimal) -> Self {
        Self {
            open_time,
            open: price,
            high: price,
            low: price,
            close: price,
            volume: Decimal::ZERO,
            tick_count: 0,
        }
    }

    fn update(&mut self, tick: &Tick) {
        self.high = self.high.max(tick.price);
        self.low = self.low.min(tick.price);
        self.close = tick.price;
        self.volume += tick.volume;
        self.tick_count += 1;
    }

    fn range(&self) -> Decimal {
        self.high - self.low
    }

    const fn finish(self, threshold: Decimal) -> RangeBar {
        RangeBar::new(
            self.open_time,
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
            threshold,
        )
    }

    fn snapshot(&self, threshold: Decimal) -> Option<RangeBar> {
        (self.tick_count > 0).then(|| {
            RangeBar::new(
                self.open_time,
                self.open,
                self.high,
                self.low,
                self.close,
                self.volume,
                threshold,
            )
        })
    }
}
