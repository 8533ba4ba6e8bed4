// =============================================================================
// Price Momentum — percentage change over a look-back period
// =============================================================================
//
//   momentum = ((close_now - close_{now-period}) / close_{now-period}) * 100
//
// Positive momentum indicates upward movement; negative indicates downward.

/// Momentum of the most recent close against the close `period` bars earlier.
///
/// Returns `None` when `closes.len() <= period`, `period == 0`, or the
/// reference close is zero.
pub fn calculate_momentum(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() <= period {
        return None;
    }

    let current = closes[closes.len() - 1];
    let past = closes[closes.len() - 1 - period];
    if past == 0.0 {
        return None;
    }

    let momentum = (current - past) / past * 100.0;
    momentum.is_finite().then_some(momentum)
}
