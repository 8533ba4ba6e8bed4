// =============================================================================
// Trend Classification — short / long SMA crossover
// =============================================================================
//
// Decision rule:
//   bullish  = SMA_short > SMA_long AND close > SMA_short
//   bearish  = SMA_short < SMA_long AND close < SMA_short
//   neutral  = anything else

use crate::types::Trend;

use super::sma::calculate_sma;

/// Classify the trend of `closes` with the given short/long SMA periods.
///
/// Returns [`Trend::InsufficientData`] when fewer than `long_period` closes
/// exist or either average is unavailable.
pub fn analyze_trend(closes: &[f64], short_period: usize, long_period: usize) -> Trend {
    if closes.len() < long_period {
        return Trend::InsufficientData;
    }

    let (Some(short_ma), Some(long_ma), Some(&current)) = (
        calculate_sma(closes, short_period),
        calculate_sma(closes, long_period),
        closes.last(),
    ) else {
        return Trend::InsufficientData;
    };

    if short_ma > long_ma && current > short_ma {
        Trend::Bullish
    } else if short_ma < long_ma && current < short_ma {
        Trend::Bearish
    } else {
        Trend::Neutral
    }
}
