// =============================================================================
// Support / Resistance — strict local extrema
// =============================================================================
//
// For every interior index i with window <= i < len - window:
//   local minimum  <=> all `window` closes before AND after are strictly greater
//   local maximum  <=> all `window` closes before AND after are strictly lower
//
// support    = lowest local minimum
// resistance = highest local maximum
//
// The first and last `window` closes are never candidates.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SupportResistance {
    pub support: Option<f64>,
    pub resistance: Option<f64>,
}

/// Scan `closes` for local extrema using a `window`-wide neighbourhood.
///
/// Both levels are `None` when `closes.len() < 2 * window` or `window == 0`;
/// otherwise each level is `None` only if no extremum of that kind exists.
pub fn detect_support_resistance(closes: &[f64], window: usize) -> SupportResistance {
    if window == 0 || closes.len() < window * 2 {
        return SupportResistance::default();
    }

    let mut support: Option<f64> = None;
    let mut resistance: Option<f64> = None;

    for i in window..closes.len().saturating_sub(window) {
        let current = closes[i];
        let left = &closes[i - window..i];
        let right = &closes[i + 1..=i + window];

        let is_min = left.iter().chain(right).all(|&p| p > current);
        let is_max = left.iter().chain(right).all(|&p| p < current);

        if is_min {
            support = Some(support.map_or(current, |s| s.min(current)));
        }
        if is_max {
            resistance = Some(resistance.map_or(current, |r| r.max(current)));
        }
    }

    SupportResistance { support, resistance }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v_shape_has_support_only() {
        let closes = [5.0, 4.0, 3.0, 2.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let sr = detect_support_resistance(&closes, 2);
        assert_eq!(sr.support, Some(1.0));
        assert_eq!(sr.resistance, None);
    }

    #[test]
    fn peak_has_resistance_only() {
        let closes = [1.0, 2.0, 3.0, 9.0, 3.0, 2.0, 1.0];
        let sr = detect_support_resistance(&closes, 3);
        assert_eq!(sr.resistance, Some(9.0));
        assert_eq!(sr.support, None);
    }

    #[test]
    fn picks_extreme_of_several_levels() {
        let closes = [
            10.0, 8.0, 6.0, 8.0, 10.0, 12.0, 10.0, 8.0, 4.0, 8.0, 10.0, 14.0, 10.0, 9.0,
        ];
        let sr = detect_support_resistance(&closes, 2);
        assert_eq!(sr.support, Some(4.0));
        assert_eq!(sr.resistance, Some(14.0));
    }

    #[test]
    fn plateau_is_not_an_extremum() {
        let closes = [5.0, 4.0, 1.0, 1.0, 4.0, 5.0];
        let sr = detect_support_resistance(&closes, 2);
        assert_eq!(sr, SupportResistance::default());
    }

    #[test]
    fn too_short_input() {
        let sr = detect_support_resistance(&[1.0, 2.0, 3.0], 2);
        assert_eq!(sr, SupportResistance::default());
    }
}
