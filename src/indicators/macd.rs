// =============================================================================
// MACD — Moving Average Convergence Divergence (MACD line only)
// =============================================================================
//
//   window    = last `slow` closes
//   MACD line = EMA(window, fast) - EMA(window, slow)
//
// The signal line (EMA of the MACD line) and the histogram are not computed:
// this module only ever has one MACD value per call, so both stay `None`.
// Completing them needs a MACD series over at least `slow + signal` closes.

use serde::{Deserialize, Serialize};

use super::ema::calculate_ema;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdResult {
    pub macd: f64,
    /// Always `None`; see module docs.
    pub signal: Option<f64>,
    /// Always `None`; see module docs.
    pub histogram: Option<f64>,
}

/// Compute the MACD line over the trailing `slow` closes.
///
/// `_signal` is accepted so callers pass the conventional (12, 26, 9) triple;
/// it has no effect yet.
///
/// Returns `None` when fewer than `slow` closes exist or either EMA is
/// unavailable.
pub fn calculate_macd(closes: &[f64], fast: usize, slow: usize, _signal: usize) -> Option<MacdResult> {
    if slow == 0 || closes.len() < slow {
        return None;
    }

    let window = &closes[closes.len() - slow..];
    let ema_fast = calculate_ema(window, fast)?;
    let ema_slow = calculate_ema(window, slow)?;

    Some(MacdResult {
        macd: ema_fast - ema_slow,
        signal: None,
        histogram: None,
    })
}
