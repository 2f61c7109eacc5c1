//! Probe bookkeeping.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

/// Bar counts observed for each probed threshold of one day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeResult {
    counts: BTreeMap<Decimal, usize>,
}

impl ProbeResult {
    /// Creates an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the bar count for a threshold, replacing any earlier value.
    pub fn insert(&mut self, threshold: Decimal, bars: usize) {
        self.counts.insert(threshold, bars);
    }

    /// Returns the recorded bar count for a threshold.
    #[must_use]
    pub fn get(&self, threshold: Decimal) -> Option<usize> {
        self.counts.get(&threshold).copied()
    }

    /// Returns true if the threshold has been probed.
    #[must_use]
    pub fn contains(&self, threshold: Decimal) -> bool {
        self.counts.contains_key(&threshold)
    }

    /// Returns the number of probed thresholds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns true if nothing has been probed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterates `(threshold, bars)` pairs in ascending threshold order.
    pub fn iter(&self) -> impl Iterator<Item = (Decimal, usize)> + '_ {
        self.counts.iter().map(|(&threshold, &bars)| (threshold, bars))
    }

    /// Returns the threshold whose bar count is closest to `target`.
    ///
    /// Exact ties go to the smaller threshold.
    #[must_use]
    pub fn best(&self, target: usize) -> Option<Decimal> {
        // Ascending iteration plus first-minimum semantics gives the
        // smaller threshold on ties.
        self.iter()
            .min_by_key(|&(_, bars)| bars.abs_diff(target))
            .map(|(threshold, _)| threshold)
    }
}

impl FromIterator<(Decimal, usize)> for ProbeResult {
    fn from_iter<I: IntoIterator<Item = (Decimal, usize)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}
