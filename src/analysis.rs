// =============================================================================
// Technical Analysis — snapshot, history statistics, indicator panel
// =============================================================================
//
// Combines the pure indicators into the read-only views the game renders.
// Every value is recomputed from the caller's series on demand; nothing here
// holds state, so identical input always produces identical output.
//
// Snapshot rule:
//   < 20 closes  => every field absent, trend = insufficient_data
//   otherwise    => RSI(14), S/R(5), Trend(5, 20), Momentum(10), SMA 5/20/50,
//                   each rounded to 2 decimals when present

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::indicators::{
    analyze_trend, calculate_bollinger, calculate_ema, calculate_macd, calculate_momentum,
    calculate_rsi, calculate_sma, detect_support_resistance, BollingerResult, MacdResult,
};
use crate::market_data::PricePoint;
use crate::types::{RiskLevel, Trend};

/// Minimum number of closes before a snapshot carries any readings.
pub const SNAPSHOT_MIN_POINTS: usize = 20;
pub const RSI_PERIOD: usize = 14;
pub const LEVELS_WINDOW: usize = 5;
pub const TREND_SHORT: usize = 5;
pub const TREND_LONG: usize = 20;
pub const MOMENTUM_PERIOD: usize = 10;

/// Bars looked at for the 52-bar high / low.
const RANGE_BARS: usize = 52;
/// Bars back for the one-year return on monthly data.
const ONE_YEAR_BARS: usize = 12;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MovingAverages {
    pub ma5: Option<f64>,
    pub ma20: Option<f64>,
    pub ma50: Option<f64>,
}

/// Headline readings for one series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSnapshot {
    pub trend: Trend,
    pub rsi: Option<f64>,
    pub support: Option<f64>,
    pub resistance: Option<f64>,
    pub momentum: Option<f64>,
    pub moving_averages: MovingAverages,
}

impl TechnicalSnapshot {
    /// The snapshot returned for series too short to analyse.
    pub fn insufficient() -> Self {
        Self {
            trend: Trend::InsufficientData,
            rsi: None,
            support: None,
            resistance: None,
            momentum: None,
            moving_averages: MovingAverages::default(),
        }
    }
}

/// Build the [`TechnicalSnapshot`] for `closes` (oldest first).
pub fn technical_snapshot(closes: &[f64]) -> TechnicalSnapshot {
    if closes.len() < SNAPSHOT_MIN_POINTS {
        debug!(points = closes.len(), "snapshot: insufficient data");
        return TechnicalSnapshot::insufficient();
    }

    let levels = detect_support_resistance(closes, LEVELS_WINDOW);

    TechnicalSnapshot {
        trend: analyze_trend(closes, TREND_SHORT, TREND_LONG),
        rsi: calculate_rsi(closes, RSI_PERIOD).map(round2),
        support: levels.support.map(round2),
        resistance: levels.resistance.map(round2),
        momentum: calculate_momentum(closes, MOMENTUM_PERIOD).map(round2),
        moving_averages: MovingAverages {
            ma5: calculate_sma(closes, 5).map(round2),
            ma20: calculate_sma(closes, 20).map(round2),
            ma50: calculate_sma(closes, 50).map(round2),
        },
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// =============================================================================
// History statistics
// =============================================================================

/// Return / range / volatility summary of a bar series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryStats {
    pub week52_high: f64,
    pub week52_low: f64,
    pub last_price: f64,
    /// First close to last close, percent.
    pub five_year_return: f64,
    /// Close 12 bars back (or the first close) to last close, percent.
    pub one_year_return: f64,
    /// Population σ of bar-to-bar returns, percent.
    pub volatility: f64,
    pub risk_level: RiskLevel,
}

/// Summarise `series`. Returns `None` for an empty series.
pub fn history_stats(series: &[PricePoint]) -> Option<HistoryStats> {
    let first = series.first()?;
    let last = series.last()?;

    let recent = &series[series.len().saturating_sub(RANGE_BARS)..];
    let week52_high = recent.iter().map(|p| p.high).fold(f64::NEG_INFINITY, f64::max);
    let week52_low = recent.iter().map(|p| p.low).fold(f64::INFINITY, f64::min);

    let five_year_return = pct_change(first.close, last.close);
    let year_ago = series[series.len().saturating_sub(ONE_YEAR_BARS)].close;
    let one_year_return = pct_change(year_ago, last.close);

    let returns: Vec<f64> = series
        .windows(2)
        .filter(|w| w[0].close != 0.0)
        .map(|w| (w[1].close - w[0].close) / w[0].close)
        .collect();
    let volatility = if returns.is_empty() {
        0.0
    } else {
        let n = returns.len() as f64;
        let mean = returns.iter().sum::<f64>() / n;
        let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
        round2(variance.sqrt() * 100.0)
    };

    Some(HistoryStats {
        week52_high: round2(week52_high),
        week52_low: round2(week52_low),
        last_price: round2(last.close),
        five_year_return: round2(five_year_return),
        one_year_return: round2(one_year_return),
        // Bucketed on the reported (rounded) value.
        volatility,
        risk_level: RiskLevel::from_volatility(volatility),
    })
}

fn pct_change(from: f64, to: f64) -> f64 {
    if from == 0.0 {
        0.0
    } else {
        (to - from) / from * 100.0
    }
}

// =============================================================================
// Indicator panel
// =============================================================================

/// Secondary indicators shown beneath the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorPanel {
    pub ema12: Option<f64>,
    pub ema26: Option<f64>,
    pub bollinger: Option<BollingerResult>,
    pub macd: Option<MacdResult>,
}

pub fn indicator_panel(closes: &[f64]) -> IndicatorPanel {
    IndicatorPanel {
        ema12: calculate_ema(closes, 12).map(round2),
        ema26: calculate_ema(closes, 26).map(round2),
        bollinger: calculate_bollinger(closes, 20, 2.0),
        macd: calculate_macd(closes, 12, 26, 9),
    }
}
