use std::collections::{HashMap, VecDeque};

use tracing::debug;

use super::PricePoint;

// ---------------------------------------------------------------------------
// SeriesBook -- rolling bar history per symbol
// ---------------------------------------------------------------------------

/// Ring buffer that stores the most recent bars per symbol. Appending past
/// `max_points` evicts the oldest bar, so a symbol never holds more than
/// `max_points` entries.
///
/// Owned by a single [`crate::live::LiveMarket`]; callers needing shared
/// access wrap the owner, not the book.
#[derive(Debug, Clone)]
pub struct SeriesBook {
    series: HashMap<String, VecDeque<PricePoint>>,
    max_points: usize,
}

impl SeriesBook {
    /// Create a book that retains at most `max_points` bars per symbol.
    pub fn new(max_points: usize) -> Self {
        Self {
            series: HashMap::new(),
            max_points: max_points.max(1),
        }
    }

    pub fn max_points(&self) -> usize {
        self.max_points
    }

    /// Append a bar for `symbol`, trimming the oldest bars to stay in budget.
    ///
    /// * A bar with the same timestamp as the last one replaces it.
    /// * A bar older than the last one is dropped, keeping the series
    ///   strictly chronological.
    pub fn push(&mut self, symbol: &str, point: PricePoint) {
        let cap = self.max_points;
        let ring = self
            .series
            .entry(symbol.to_string())
            .or_insert_with(|| VecDeque::with_capacity(cap + 1));

        if let Some(last) = ring.back() {
            if point.timestamp < last.timestamp {
                debug!(
                    symbol,
                    timestamp = point.timestamp,
                    last = last.timestamp,
                    "out-of-order bar dropped"
                );
                return;
            }
            if point.timestamp == last.timestamp {
                ring.pop_back();
            }
        }

        ring.push_back(point);
        while ring.len() > cap {
            ring.pop_front();
        }
    }

    /// Return the most recent `count` bars (oldest-first order).
    pub fn recent(&self, symbol: &str, count: usize) -> Vec<PricePoint> {
        match self.series.get(symbol) {
            Some(ring) => {
                let start = ring.len().saturating_sub(count);
                ring.iter().skip(start).copied().collect()
            }
            None => Vec::new(),
        }
    }

    /// Every retained bar for `symbol` (oldest-first order).
    pub fn all(&self, symbol: &str) -> Vec<PricePoint> {
        self.recent(symbol, self.max_points)
    }

    /// Return the most recent `count` close prices (oldest-first order).
    pub fn closes(&self, symbol: &str, count: usize) -> Vec<f64> {
        self.recent(symbol, count).iter().map(|p| p.close).collect()
    }

    /// The newest bar for `symbol`, if any.
    pub fn last(&self, symbol: &str) -> Option<PricePoint> {
        self.series.get(symbol).and_then(|ring| ring.back().copied())
    }

    pub fn count(&self, symbol: &str) -> usize {
        self.series.get(symbol).map_or(0, VecDeque::len)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
