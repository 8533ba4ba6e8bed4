// =============================================================================
// Finance Wars — stock-trading game engine
// =============================================================================
//
// Library half of the crate: the simulator, technical analysis, advice,
// portfolio and live market, plus the HTTP surface and the clients used to
// reach external collaborators. `main.rs` wires these into the game server.
// =============================================================================

pub mod advice;
pub mod analysis;
pub mod api;
pub mod app_state;
pub mod catalog;
pub mod client;
pub mod indicators;
pub mod live;
pub mod market_data;
pub mod mentor;
pub mod portfolio;
pub mod quiz;
pub mod runtime_config;
pub mod simulator;
pub mod types;
