// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the technical indicators shown on
// the analysis screen. Every public function returns `Option<T>` (or a value
// with optional fields) so callers are forced to handle insufficient-data and
// numerical-edge-case scenarios instead of rendering NaN.

pub mod bollinger;
pub mod ema;
pub mod levels;
pub mod macd;
pub mod momentum;
pub mod rsi;
pub mod sma;
pub mod trend;

pub use bollinger::{calculate_bollinger, BollingerResult};
pub use ema::{calculate_ema, ema_series};
pub use levels::{detect_support_resistance, SupportResistance};
pub use macd::{calculate_macd, MacdResult};
pub use momentum::calculate_momentum;
pub use rsi::{calculate_rsi, RsiZone};
pub use sma::calculate_sma;
pub use trend::analyze_trend;
