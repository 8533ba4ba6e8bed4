// =============================================================================
// Advice Heuristics — categorical guidance from P/L and technical readings
// =============================================================================
//
// Pure string selection. Inputs are the player's overall P/L, learning mode,
// selected stock and (optionally) a technical snapshot; outputs are fixed
// advice lines. No randomness and no I/O.
//
// League ladder (overall P/L, rupees):
//   >= 20 000  Elite Trader
//   >= 10 000  Strategic Trader
//   >=  3 000  Market Explorer
//   otherwise  Rookie Trader

use serde::{Deserialize, Serialize};

use crate::analysis::TechnicalSnapshot;
use crate::indicators::RsiZone;
use crate::types::{LearningMode, Trend};

/// Advice banner for the current overall P/L. `None` when exactly flat.
pub fn pnl_advice(overall_pnl: f64, mode: LearningMode) -> Option<&'static str> {
    if overall_pnl < 0.0 {
        Some(match mode {
            LearningMode::Beginner => {
                "You are in loss. As a beginner, avoid panic trading and wait for confirmation."
            }
            LearningMode::Intermediate => {
                "Loss detected. Review volatility and news before next trade."
            }
            LearningMode::Advanced => "Loss detected. Consider stop-loss and risk management.",
        })
    } else if overall_pnl > 0.0 {
        Some("You are in profit. Follow your strategy and avoid overtrading.")
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum League {
    Rookie,
    MarketExplorer,
    Strategic,
    Elite,
}

impl League {
    pub fn for_pnl(overall_pnl: f64) -> Self {
        if overall_pnl >= 20_000.0 {
            Self::Elite
        } else if overall_pnl >= 10_000.0 {
            Self::Strategic
        } else if overall_pnl >= 3_000.0 {
            Self::MarketExplorer
        } else {
            Self::Rookie
        }
    }
}

impl std::fmt::Display for League {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rookie => write!(f, "Rookie Trader"),
            Self::MarketExplorer => write!(f, "Market Explorer"),
            Self::Strategic => write!(f, "Strategic Trader"),
            Self::Elite => write!(f, "Elite Trader"),
        }
    }
}

/// Explain the outcome of a completed sale.
pub fn trade_explanation(realized_pnl: f64) -> &'static str {
    if realized_pnl > 0.0 {
        "You made a profit because the stock price increased after you bought it. \
         This indicates a positive market movement."
    } else if realized_pnl < 0.0 {
        "You made a loss because the stock price dropped after purchase. \
         This may be due to volatility or poor timing."
    } else {
        "There was no profit or loss because the selling price was equal to the buying price."
    }
}

/// Offline mentor: keyword match on the player's question.
///
/// Keywords are checked in order `buy`, `sell`, `loss`, `profit`.
pub fn mentor_reply(
    question: &str,
    selected_stock: Option<&str>,
    overall_pnl: f64,
    mode: LearningMode,
) -> &'static str {
    if selected_stock.is_none() {
        return "Select a stock first so I can guide you better.";
    }

    let text = question.to_lowercase();

    if text.contains("buy") {
        if overall_pnl < 0.0 {
            return match mode {
                LearningMode::Beginner => {
                    "You are already in loss. Avoid buying emotionally. Wait for confirmation."
                }
                _ => "Consider risk-reward before adding to a losing position.",
            };
        }
        return "Price looks stable. Consider buying only if volume supports it.";
    }

    if text.contains("sell") {
        if overall_pnl > 0.0 {
            return "You are in profit. Booking partial profit is a smart move.";
        }
        return "Selling now may lock losses. Check trend strength.";
    }

    if text.contains("loss") {
        return "Losses are part of trading. Focus on discipline, not recovery trades.";
    }

    if text.contains("profit") {
        return "Protect profits using stop-loss or partial booking.";
    }

    "Good question. Focus on trend, risk management, and patience."
}

/// One-line reading of a snapshot's trend and RSI.
pub fn technical_advice(snapshot: &TechnicalSnapshot) -> &'static str {
    let zone = snapshot.rsi.map(RsiZone::classify);

    match (snapshot.trend, zone) {
        (Trend::InsufficientData, _) => "Not enough price history yet. Watch a few more candles.",
        (_, Some(RsiZone::Overbought)) => {
            "RSI is overbought. Avoid chasing the price; wait for a pullback."
        }
        (_, Some(RsiZone::Oversold)) => {
            "RSI is oversold. A bounce is possible, but confirm before buying."
        }
        (Trend::Bullish, _) => "Trend is bullish. Trail your stop-loss as the price rises.",
        (Trend::Bearish, _) => "Trend is bearish. Protect capital and avoid averaging down.",
        (Trend::Neutral, _) => "No clear trend. Range trading near support and resistance works best.",
    }
}
