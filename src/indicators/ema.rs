// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = close_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The recurrence is seeded with the very first close and runs over the whole
// input. `period` only sets the multiplier; it is not a window.
// =============================================================================

/// Compute the running EMA for every close in `closes`.
///
/// The first element equals `closes[0]`; element `i` is the EMA after folding
/// in `closes[i]`.
///
/// # Edge cases
/// - `period == 0` => empty vec
/// - `closes.len() < period` => empty vec
/// - A non-finite step ends the series; downstream consumers should not trust
///   a broken tail.
pub fn ema_series(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() < period {
        return Vec::new();
    }

    let multiplier = 2.0 / (period + 1) as f64;

    let mut result = Vec::with_capacity(closes.len());
    let mut prev_ema = closes[0];
    result.push(prev_ema);

    for &close in &closes[1..] {
        let ema = close * multiplier + prev_ema * (1.0 - multiplier);
        if !ema.is_finite() {
            break;
        }
        result.push(ema);
        prev_ema = ema;
    }

    result
}

/// Final EMA value after folding in every close.
///
/// Returns `None` when the input is shorter than `period`, `period` is zero,
/// or the recurrence hit a non-finite value before the last close.
pub fn calculate_ema(closes: &[f64], period: usize) -> Option<f64> {
    let series = ema_series(closes, period);
    if series.len() != closes.len() {
        return None;
    }
    series.last().copied()
}
