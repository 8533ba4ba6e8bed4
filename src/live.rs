// =============================================================================
// Live Market — owned tick state and the fixed-interval scheduler
// =============================================================================
//
// Every tick:
//   1. Each quote takes one random-walk step.
//   2. If a symbol is selected, a bar is appended to its rolling history:
//        open  = previous live close (or the new price for the first bar)
//        close = new price
//        high  = max(open, close),  low = min(open, close)
//        time  = previous bar time + tick seconds (or `now` for the first bar)
//
// All state lives in `LiveMarket`; the scheduler just hands it to `on_tick`.
// =============================================================================

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use parking_lot::{Mutex, RwLock};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::Stock;
use crate::market_data::{PricePoint, SeriesBook};
use crate::simulator::PriceSimulator;

/// Default rolling history per symbol.
pub const DEFAULT_HISTORY_CAP: usize = 200;
/// Default tick spacing (and bar spacing) in seconds.
pub const DEFAULT_TICK_SECS: i64 = 2;

/// Quotes, selection and rolling bar history for one game session.
#[derive(Debug, Clone)]
pub struct LiveMarket {
    quotes: HashMap<String, f64>,
    selected: Option<String>,
    history: SeriesBook,
    bar_spacing_secs: i64,
    ticks: u64,
}

/// Serialisable view of a symbol's live state.
#[derive(Debug, Clone, Serialize)]
pub struct LiveView {
    pub symbol: String,
    pub price: Option<f64>,
    pub selected: bool,
    pub candles: Vec<PricePoint>,
}

impl LiveMarket {
    /// Opening quotes come from the catalog reference prices.
    pub fn new(stocks: &[Stock], history_cap: usize, bar_spacing_secs: i64) -> Self {
        let quotes = stocks.iter().map(|s| (s.symbol.clone(), s.price)).collect();
        Self {
            quotes,
            selected: None,
            history: SeriesBook::new(history_cap),
            bar_spacing_secs: bar_spacing_secs.max(1),
            ticks: 0,
        }
    }

    pub fn quote(&self, symbol: &str) -> Option<f64> {
        self.quotes.get(symbol).copied()
    }

    pub fn quotes(&self) -> &HashMap<String, f64> {
        &self.quotes
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Start recording bars for `symbol`. Unknown symbols are rejected.
    pub fn select(&mut self, symbol: &str) -> Result<()> {
        if !self.quotes.contains_key(symbol) {
            bail!("unknown symbol: {symbol}");
        }
        info!(symbol, "live symbol selected");
        self.selected = Some(symbol.to_string());
        Ok(())
    }

    /// Stop recording bars. Quotes keep moving.
    pub fn deselect(&mut self) {
        if let Some(prev) = self.selected.take() {
            info!(symbol = %prev, "live symbol deselected");
        }
    }

    pub fn candles(&self, symbol: &str) -> Vec<PricePoint> {
        self.history.all(symbol)
    }

    pub fn closes(&self, symbol: &str) -> Vec<f64> {
        self.history.closes(symbol, self.history.max_points())
    }

    pub fn view(&self, symbol: &str) -> LiveView {
        LiveView {
            symbol: symbol.to_string(),
            price: self.quote(symbol),
            selected: self.selected() == Some(symbol),
            candles: self.candles(symbol),
        }
    }

    /// Advance every quote by one step and record a bar for the selection.
    pub fn on_tick<R: Rng>(&mut self, sim: &mut PriceSimulator<R>, now: i64) {
        self.ticks += 1;

        for price in self.quotes.values_mut() {
            *price = sim.step(*price);
        }

        let Some(symbol) = self.selected.clone() else {
            return;
        };
        let Some(close) = self.quote(&symbol) else {
            return;
        };

        let last = self.history.last(&symbol);
        let open = last.map_or(close, |bar| bar.close);
        let timestamp = last.map_or(now, |bar| bar.timestamp + self.bar_spacing_secs);

        self.history.push(
            &symbol,
            PricePoint {
                timestamp,
                open,
                high: open.max(close),
                low: open.min(close),
                close,
            },
        );

        debug!(
            symbol = %symbol,
            close,
            bars = self.history.count(&symbol),
            "live bar recorded"
        );
    }
}

/// Drive `market.on_tick` every `period` until the task is aborted.
///
/// The first tick fires one full `period` after start. Other holders of both
/// locks must take `market` before `sim`.
pub async fn run_ticker<R: Rng + Send>(
    market: Arc<RwLock<LiveMarket>>,
    sim: Arc<Mutex<PriceSimulator<R>>>,
    period: Duration,
) {
    if period.is_zero() {
        warn!("tick interval is zero; live ticker not started");
        return;
    }

    info!(period_ms = period.as_millis() as u64, "live ticker starting");
    let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        let now = chrono::Utc::now().timestamp();
        // Lock order: market, then simulator.
        let mut live = market.write();
        let mut guard = sim.lock();
        live.on_tick(&mut *guard, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_stocks;

    fn market(cap: usize) -> LiveMarket {
        LiveMarket::new(&default_stocks(), cap, DEFAULT_TICK_SECS)
    }

    #[test]
    fn opening_quotes_match_catalog() {
        let m = market(DEFAULT_HISTORY_CAP);
        assert_eq!(m.quote("TCS"), Some(3_800.0));
        assert_eq!(m.quotes().len(), 56);
        assert!(m.selected().is_none());
    }

    #[test]
    fn tick_moves_quotes_without_recording_when_unselected() {
        let mut m = market(DEFAULT_HISTORY_CAP);
        let mut sim = PriceSimulator::seeded(1);
        m.on_tick(&mut sim, 1_000);
        assert_eq!(m.ticks(), 1);
        let price = m.quote("TCS").unwrap();
        assert!((3_762.0..=3_838.0).contains(&price));
        assert!(m.candles("TCS").is_empty());
    }

    #[test]
    fn selected_symbol_records_chained_bars() {
        let mut m = market(DEFAULT_HISTORY_CAP);
        let mut sim = PriceSimulator::seeded(2);
        m.select("INFY").unwrap();

        m.on_tick(&mut sim, 1_000);
        m.on_tick(&mut sim, 5_000);
        m.on_tick(&mut sim, 9_000);

        let bars = m.candles("INFY");
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].timestamp, 1_000);
        assert_eq!(bars[0].open, bars[0].close);
        assert_eq!(bars[1].timestamp, 1_002);
        assert_eq!(bars[2].timestamp, 1_004);
        for w in bars.windows(2) {
            assert_eq!(w[1].open, w[0].close);
        }
        assert!(bars.iter().all(PricePoint::is_consistent));
        assert_eq!(bars[2].close, m.quote("INFY").unwrap());
    }

    #[test]
    fn history_is_capped() {
        let mut m = market(DEFAULT_HISTORY_CAP);
        let mut sim = PriceSimulator::seeded(3);
        m.select("SBIN").unwrap();
        for t in 0..450 {
            m.on_tick(&mut sim, t);
        }
        assert_eq!(m.candles("SBIN").len(), DEFAULT_HISTORY_CAP);
        assert_eq!(m.closes("SBIN").len(), DEFAULT_HISTORY_CAP);
    }

    #[test]
    fn deselect_stops_recording() {
        let mut m = market(DEFAULT_HISTORY_CAP);
        let mut sim = PriceSimulator::seeded(4);
        m.select("LT").unwrap();
        m.on_tick(&mut sim, 0);
        m.deselect();
        m.on_tick(&mut sim, 2);
        assert_eq!(m.candles("LT").len(), 1);
        assert!(!m.view("LT").selected);
    }

    #[test]
    fn unknown_symbol_cannot_be_selected() {
        let mut m = market(DEFAULT_HISTORY_CAP);
        assert!(m.select("AAPL").is_err());
        assert!(m.selected().is_none());
    }

    #[test]
    fn reselecting_resumes_existing_history() {
        let mut m = market(DEFAULT_HISTORY_CAP);
        let mut sim = PriceSimulator::seeded(5);
        m.select("ITC").unwrap();
        m.on_tick(&mut sim, 100);
        m.select("WIPRO").unwrap();
        m.on_tick(&mut sim, 102);
        m.select("ITC").unwrap();
        m.on_tick(&mut sim, 104);
        let bars = m.candles("ITC");
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].timestamp, 102);
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_drives_market_on_interval() {
        let m = Arc::new(RwLock::new(market(DEFAULT_HISTORY_CAP)));
        let sim = Arc::new(Mutex::new(PriceSimulator::seeded(6)));
        m.write().select("TCS").unwrap();

        let handle = tokio::spawn(run_ticker(m.clone(), sim, Duration::from_secs(2)));
        tokio::time::sleep(Duration::from_millis(6_500)).await;
        handle.abort();

        assert_eq!(m.read().ticks(), 3);
        assert_eq!(m.read().candles("TCS").len(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn ticker_shares_locks_with_other_writers() {
        let m = Arc::new(RwLock::new(market(DEFAULT_HISTORY_CAP)));
        let sim = Arc::new(Mutex::new(PriceSimulator::seeded(7)));
        m.write().select("ITC").unwrap();

        let handle = tokio::spawn(run_ticker(m.clone(), sim.clone(), Duration::from_millis(1)));

        let (m2, sim2) = (m.clone(), sim.clone());
        tokio::task::spawn_blocking(move || {
            for t in 0..300 {
                let mut live = m2.write();
                let mut guard = sim2.lock();
                live.on_tick(&mut *guard, t);
                drop(guard);
                drop(live);
                std::thread::sleep(Duration::from_micros(50));
            }
        })
        .await
        .unwrap();

        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.abort();

        assert!(m.read().ticks() > 300);
    }
}
