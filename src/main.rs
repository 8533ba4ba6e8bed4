// =============================================================================
// Finance Wars — Main Entry Point
// =============================================================================
//
// Boots the game server: loads config, seeds the five-year histories, starts
// the live ticker and serves the HTTP API until Ctrl+C.
//
// The config file is only written on first run (defaults). Env overrides
// apply to this process alone.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use finance_wars::api;
use finance_wars::app_state::AppState;
use finance_wars::live::run_ticker;
use finance_wars::runtime_config::RuntimeConfig;

const CONFIG_PATH: &str = "runtime_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║        Finance Wars — Starting Up                        ║");
    info!("╚══════════════════════════════════════════════════════════╝");

    let mut config = RuntimeConfig::load_or_init(CONFIG_PATH).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });
    config.apply_env_overrides();

    let gemini_key = std::env::var("GEMINI_API_KEY").ok();
    if gemini_key.is_none() {
        warn!("GEMINI_API_KEY not set — mentor chat will use fallback replies");
    }

    let bind_addr = config.bind_addr.clone();
    let tick_period = Duration::from_millis(config.tick_interval_ms);

    // ── 2. Build shared state ────────────────────────────────────────────
    let state = Arc::new(AppState::new(config, gemini_key)?);

    // ── 3. Live ticker ───────────────────────────────────────────────────
    let ticker = tokio::spawn(run_ticker(
        state.live.clone(),
        state.simulator.clone(),
        tick_period,
    ));

    // ── 4. API server ────────────────────────────────────────────────────
    let app = api::rest::router(state.clone());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server on {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening. Press Ctrl+C to stop.");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
            warn!("Shutdown signal received — stopping gracefully");
        })
        .await
        .context("API server failed")?;

    // ── 5. Graceful shutdown ─────────────────────────────────────────────
    ticker.abort();

    info!("Finance Wars shut down complete.");
    Ok(())
}
