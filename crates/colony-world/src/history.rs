//! Rolling production history.
//!
//! A [`HistorySeries`] keeps two windows over one resource:
//!
//! - the last [`TICK_SAMPLES`] per-tick amounts (idle ticks record zero),
//! - the last [`DAILY_BUCKETS`] daily totals, the newest of which is the
//!   day in progress.
//!
//! The tick engine calls [`HistorySeries::record`] once per building per
//! tick and [`HistorySeries::roll_day`] on every day rollover.

use std::collections::VecDeque;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of daily buckets retained.
pub const DAILY_BUCKETS: usize = 7;

/// Number of per-tick samples retained.
pub const TICK_SAMPLES: usize = 30;

/// Per-tick and per-day production of one resource at one building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySeries {
    /// Daily totals, oldest first. Never empty; the back is today.
    days: VecDeque<Decimal>,
    /// Per-tick amounts, oldest first.
    ticks: VecDeque<Decimal>,
}

impl Default for HistorySeries {
    fn default() -> Self {
        Self::new()
    }
}

impl HistorySeries {
    /// A series with a single empty bucket for today and no tick samples.
    pub fn new() -> Self {
        Self {
            days: VecDeque::from([Decimal::ZERO]),
            ticks: VecDeque::with_capacity(TICK_SAMPLES),
        }
    }

    /// Add this tick's amount to today's bucket and append it as a sample.
    pub fn record(&mut self, amount: Decimal) {
        if let Some(today) = self.days.back_mut() {
            *today = today.saturating_add(amount);
        }
        self.push_sample(amount);
    }

    /// Overwrite today's bucket with `value` and append it as a sample.
    ///
    /// Housing uses this to track occupancy rather than accumulate.
    pub fn overwrite(&mut self, value: Decimal) {
        if let Some(today) = self.days.back_mut() {
            *today = value;
        }
        self.push_sample(value);
    }

    /// Start a new day: push an empty bucket, dropping the oldest once more
    /// than [`DAILY_BUCKETS`] exist.
    pub fn roll_day(&mut self) {
        self.days.push_back(Decimal::ZERO);
        while self.days.len() > DAILY_BUCKETS {
            self.days.pop_front();
        }
    }

    /// Today's running total.
    pub fn today(&self) -> Decimal {
        self.days.back().copied().unwrap_or(Decimal::ZERO)
    }

    /// Most recent per-tick sample, if any tick has been recorded.
    pub fn last_sample(&self) -> Option<Decimal> {
        self.ticks.back().copied()
    }

    /// Daily totals, oldest first.
    pub fn days(&self) -> impl ExactSizeIterator<Item = Decimal> + '_ {
        self.days.iter().copied()
    }

    /// Per-tick samples, oldest first.
    pub fn samples(&self) -> impl ExactSizeIterator<Item = Decimal> + '_ {
        self.ticks.iter().copied()
    }

    /// Rebuild a series from persisted windows, trimming each to its limit.
    ///
    /// An empty day list yields a single empty bucket.
    pub fn from_parts(days: Vec<Decimal>, samples: Vec<Decimal>) -> Self {
        let mut days: VecDeque<Decimal> = days.into();
        while days.len() > DAILY_BUCKETS {
            days.pop_front();
        }
        if days.is_empty() {
            days.push_back(Decimal::ZERO);
        }
        let mut ticks: VecDeque<Decimal> = samples.into();
        while ticks.len() > TICK_SAMPLES {
            ticks.pop_front();
        }
        Self { days, ticks }
    }

    fn push_sample(&mut self, amount: Decimal) {
        if self.ticks.len() == TICK_SAMPLES {
            self.ticks.pop_front();
        }
        self.ticks.push_back(amount);
    }
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects, clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn record_accumulates_today() {
        let mut series = HistorySeries::new();
        series.record(dec!(0.1));
        series.record(dec!(0.1));
        assert_eq!(series.today(), dec!(0.2));
        assert_eq!(series.samples().len(), 2);
        assert_eq!(series.last_sample(), Some(dec!(0.1)));
    }

    #[test]
    fn overwrite_replaces_today() {
        let mut series = HistorySeries::new();
        series.overwrite(dec!(3));
        series.overwrite(dec!(4));
        assert_eq!(series.today(), dec!(4));
    }

    #[test]
    fn roll_day_keeps_seven_buckets() {
        let mut series = HistorySeries::new();
        for day in 1..=10 {
            series.record(Decimal::from(day));
            series.roll_day();
        }
        assert_eq!(series.days().len(), DAILY_BUCKETS);
        assert_eq!(series.today(), Decimal::ZERO);
        let days: Vec<Decimal> = series.days().collect();
        assert_eq!(days.first().copied(), Some(dec!(5)));
    }

    #[test]
    fn samples_are_bounded() {
        let mut series = HistorySeries::new();
        for _ in 0..(TICK_SAMPLES + 5) {
            series.record(Decimal::ONE);
        }
        assert_eq!(series.samples().len(), TICK_SAMPLES);
    }

    #[test]
    fn json_keeps_both_windows_exact() {
        let mut series = HistorySeries::new();
        series.record(dec!(0.1));
        series.roll_day();
        series.record(dec!(0.066666));
        let json = serde_json::to_string(&series).unwrap();
        let decoded: HistorySeries = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, series);
        assert_eq!(decoded.days().len(), 2);
        assert_eq!(decoded.today(), dec!(0.066666));
    }

    #[test]
    fn from_parts_never_empty() {
        let series = HistorySeries::from_parts(Vec::new(), Vec::new());
        assert_eq!(series.days().len(), 1);
        assert!(series.last_sample().is_none());
    }
}
