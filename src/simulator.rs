// =============================================================================
// Price Simulator — synthetic monthly history and live random-walk ticks
// =============================================================================
//
// History (60 monthly bars ending at a known price):
//   start   = 0.70 * target
//   r_i     = (u - RETURN_BIAS) * MONTHLY_RETURN_SCALE      u ~ U[0, 1)
//   drift   = (target - start) / start / 60
//   open    = round(cur)
//   close   = round(cur * (1 + r_i + drift))
//   vol     ~ U[0.01, 0.03)
//   high    = round(max(open, close) * (1 + vol))
//   low     = round(min(open, close) * (1 - vol))
// The last bar is then pinned to close exactly at `target`.
//
// Live tick:
//   change  = (u - 0.5) * 0.02                              (±1 %)
//   next    = max(1, round(prev * (1 + change)))
// A non-finite previous price yields FALLBACK_PRICE instead of NaN.
//
// Randomness is injected so that seeded runs are reproducible.
// =============================================================================

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::market_data::{PricePoint, PriceSeries};

/// Number of bars produced by [`PriceSimulator::generate_history`].
pub const HISTORY_POINTS: usize = 60;
/// Timestamp of the first synthetic bar (2019-01-01T00:00:00Z).
pub const HISTORY_EPOCH: i64 = 1_546_300_800;
/// 30 days in seconds.
pub const HISTORY_STEP_SECS: i64 = 2_592_000;
/// Fraction of the target price the history starts from.
pub const HISTORY_START_FRACTION: f64 = 0.70;
/// Centre of the monthly return draw. Sitting below 0.5 skews returns
/// upward (mean +0.4 % per month before the drift term).
pub const RETURN_BIAS: f64 = 0.45;
/// Width of the monthly return draw (±4 % around the bias).
pub const MONTHLY_RETURN_SCALE: f64 = 0.08;
/// Maximum absolute live tick move (1 %).
pub const TICK_MAX_CHANGE: f64 = 0.01;
/// Price substituted when a tick is fed a non-finite previous price.
/// Marks degraded data, not a real quote.
pub const FALLBACK_PRICE: f64 = 1000.0;
/// Lowest price a live tick can produce.
pub const MIN_TICK_PRICE: f64 = 1.0;

/// Random-walk price generator over an injected RNG.
#[derive(Debug, Clone)]
pub struct PriceSimulator<R = StdRng> {
    rng: R,
}

impl PriceSimulator<StdRng> {
    /// Reproducible simulator: the same seed yields the same prices.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Simulator seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// `Some(seed)` => [`Self::seeded`], `None` => [`Self::from_entropy`].
    pub fn with_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl<R: Rng> PriceSimulator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Generate [`HISTORY_POINTS`] monthly bars whose final close is exactly
    /// `target_price`.
    ///
    /// Never fails. Non-positive targets degrade toward zero-priced bars.
    pub fn generate_history(&mut self, target_price: f64) -> PriceSeries {
        let start_price = target_price * HISTORY_START_FRACTION;
        let drift = (target_price - start_price) / start_price / HISTORY_POINTS as f64;

        let mut series = Vec::with_capacity(HISTORY_POINTS);
        let mut current = start_price;
        let mut timestamp = HISTORY_EPOCH;

        for _ in 0..HISTORY_POINTS {
            let monthly_return = (self.rng.gen::<f64>() - RETURN_BIAS) * MONTHLY_RETURN_SCALE;

            let open = current.round();
            let close = (current * (1.0 + monthly_return + drift)).round();

            let volatility = 0.01 + self.rng.gen::<f64>() * 0.02;
            let high = (open.max(close) * (1.0 + volatility)).round();
            let low = (open.min(close) * (1.0 - volatility)).round();

            series.push(PricePoint {
                timestamp,
                open,
                high,
                low,
                close,
            });
            current = close;
            timestamp += HISTORY_STEP_SECS;
        }

        if let Some(last) = series.last_mut() {
            pin_last_bar(last, target_price);
        }

        series
    }

    /// One live tick from `previous_close`.
    ///
    /// Returns [`FALLBACK_PRICE`] for non-finite input; otherwise a whole
    /// price no lower than [`MIN_TICK_PRICE`].
    pub fn step(&mut self, previous_close: f64) -> f64 {
        if !previous_close.is_finite() {
            return FALLBACK_PRICE;
        }

        let change = (self.rng.gen::<f64>() - 0.5) * 2.0 * TICK_MAX_CHANGE;
        (previous_close * (1.0 + change)).round().max(MIN_TICK_PRICE)
    }
}

/// Force the final bar to close at `target` with a ±2 % range. The range is
/// widened to cover the bar's open when the walk drifted further than that.
fn pin_last_bar(bar: &mut PricePoint, target: f64) {
    bar.close = target;
    bar.high = (target * 1.02).round().max(bar.open).max(target);
    bar.low = (target * 0.98).round().min(bar.open).min(target);
}
