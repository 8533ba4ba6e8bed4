// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
//   SMA = (close_{n-period+1} + ... + close_n) / period
//
// Only the trailing `period` closes contribute.

/// Arithmetic mean of the last `period` closes.
///
/// Returns `None` when `period == 0` or fewer than `period` closes exist.
pub fn calculate_sma(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period {
        return None;
    }

    let window = &closes[closes.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}
