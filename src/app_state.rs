// =============================================================================
// Central Application State — Finance Wars game server
// =============================================================================
//
// The single source of truth for the server. Handlers and the live ticker
// hold `Arc<AppState>` (or clones of its inner `Arc`s) and never keep
// globals of their own.
//
// Thread safety:
//   - Atomic counter for lock-free version tracking.
//   - parking_lot::RwLock / Mutex for every mutable field.
//   - The historical series map is built once at startup and read-only after.
// =============================================================================

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Result;
use parking_lot::{Mutex, RwLock};
use tracing::info;

use crate::catalog::{self, Stock};
use crate::live::LiveMarket;
use crate::market_data::PriceSeries;
use crate::mentor::MentorClient;
use crate::portfolio::{Portfolio, Valuation};
use crate::runtime_config::RuntimeConfig;
use crate::simulator::PriceSimulator;

/// State shared across all async tasks via `Arc<AppState>`.
pub struct AppState {
    // ── Version tracking ────────────────────────────────────────────────
    /// Incremented on every trade and selection change.
    pub state_version: AtomicU64,

    // ── Configuration ───────────────────────────────────────────────────
    /// Effective config for this run (file plus env overrides). Read-only.
    pub config: RuntimeConfig,

    // ── Market ──────────────────────────────────────────────────────────
    pub stocks: Vec<Stock>,
    /// Five-year monthly series per symbol, generated at startup.
    pub historical: HashMap<String, PriceSeries>,
    pub live: Arc<RwLock<LiveMarket>>,
    pub simulator: Arc<Mutex<PriceSimulator>>,

    // ── Player ──────────────────────────────────────────────────────────
    pub portfolio: RwLock<Portfolio>,

    // ── Collaborators ───────────────────────────────────────────────────
    pub mentor: MentorClient,

    // ── Timing ──────────────────────────────────────────────────────────
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Build the state from `config`. `gemini_api_key` enables the LLM
    /// mentor; without it every mentor reply uses the fallback template.
    pub fn new(config: RuntimeConfig, gemini_api_key: Option<String>) -> Result<Self> {
        let stocks = catalog::default_stocks();
        let mut sim = PriceSimulator::with_optional_seed(config.rng_seed);

        let historical: HashMap<String, PriceSeries> = stocks
            .iter()
            .map(|s| (s.symbol.clone(), sim.generate_history(s.price)))
            .collect();

        let live = LiveMarket::new(&stocks, config.history_cap, config.bar_spacing_secs());
        let portfolio = Portfolio::new(config.starting_cash);
        let mentor = MentorClient::new(config.mentor.clone(), gemini_api_key)?;

        info!(
            stocks = stocks.len(),
            seeded = config.rng_seed.is_some(),
            starting_cash = config.starting_cash,
            "application state initialised"
        );

        Ok(Self {
            state_version: AtomicU64::new(0),
            config,
            stocks,
            historical,
            live: Arc::new(RwLock::new(live)),
            simulator: Arc::new(Mutex::new(sim)),
            portfolio: RwLock::new(portfolio),
            mentor,
            start_time: std::time::Instant::now(),
        })
    }

    // ── Version Tracking ────────────────────────────────────────────────

    /// Increment the state version and return the previous value.
    pub fn increment_version(&self) -> u64 {
        self.state_version.fetch_add(1, Ordering::SeqCst)
    }

    pub fn current_state_version(&self) -> u64 {
        self.state_version.load(Ordering::SeqCst)
    }

    // ── Lookups ─────────────────────────────────────────────────────────

    pub fn stock(&self, symbol: &str) -> Option<&Stock> {
        catalog::find(&self.stocks, symbol)
    }

    pub fn history(&self, symbol: &str) -> Option<&PriceSeries> {
        self.historical.get(symbol)
    }

    /// Current live quote for `symbol`, if it is in the catalog.
    pub fn quote(&self, symbol: &str) -> Option<f64> {
        self.live.read().quote(symbol)
    }

    /// Display name of the live-selected stock.
    pub fn selected_stock_name(&self) -> Option<String> {
        let live = self.live.read();
        let symbol = live.selected()?;
        self.stock(symbol).map(|s| s.name.clone())
    }

    /// Portfolio valued at the current live quotes.
    pub fn valuation(&self) -> Valuation {
        let quotes = self.live.read().quotes().clone();
        self.portfolio.read().valuation(&quotes)
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
