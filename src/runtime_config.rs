// =============================================================================
// Runtime Configuration — server, simulation and mentor settings
// =============================================================================
//
// Every tunable lives here so the game server can be reconfigured without a
// rebuild. All fields carry `#[serde(default)]` so that adding new fields
// never breaks loading an older config file.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::live::{DEFAULT_HISTORY_CAP, DEFAULT_TICK_SECS};
use crate::portfolio::STARTING_CASH;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_tick_interval_ms() -> u64 {
    (DEFAULT_TICK_SECS as u64) * 1_000
}

fn default_history_cap() -> usize {
    DEFAULT_HISTORY_CAP
}

fn default_starting_cash() -> f64 {
    STARTING_CASH
}

fn default_mentor_model() -> String {
    "gemini-1.5-pro".to_string()
}

fn default_mentor_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_backend_url() -> String {
    "http://localhost:5000".to_string()
}

// =============================================================================
// MentorSettings
// =============================================================================

/// Where and how the LLM mentor is reached. The API key is never stored
/// here; it comes from `GEMINI_API_KEY`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorSettings {
    #[serde(default = "default_mentor_model")]
    pub model: String,

    #[serde(default = "default_mentor_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for MentorSettings {
    fn default() -> Self {
        Self {
            model: default_mentor_model(),
            base_url: default_mentor_base_url(),
            timeout_secs: default_request_timeout_secs(),
        }
    }
}

// =============================================================================
// RuntimeConfig
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Socket address the HTTP API binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Milliseconds between live ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Bars retained per symbol in the live history.
    #[serde(default = "default_history_cap")]
    pub history_cap: usize,

    /// Fixed RNG seed for reproducible runs; `None` seeds from OS entropy.
    #[serde(default)]
    pub rng_seed: Option<u64>,

    #[serde(default = "default_starting_cash")]
    pub starting_cash: f64,

    #[serde(default)]
    pub mentor: MentorSettings,

    /// Base URL used by [`crate::client::BackendClient::from_config`].
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            tick_interval_ms: default_tick_interval_ms(),
            history_cap: default_history_cap(),
            rng_seed: None,
            starting_cash: default_starting_cash(),
            mentor: MentorSettings::default(),
            backend_url: default_backend_url(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            bind_addr = %config.bind_addr,
            tick_interval_ms = config.tick_interval_ms,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "runtime config saved (atomic)");
        Ok(())
    }

    /// Load `path`, or write the defaults there on first run and return them.
    ///
    /// Environment overrides are applied by the caller afterwards and are
    /// never written back.
    pub fn load_or_init(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }

        let config = Self::default();
        config.save(path)?;
        info!(path = %path.display(), "no runtime config found, wrote defaults");
        Ok(config)
    }

    /// Seconds between consecutive live bars, matching the tick interval.
    pub fn bar_spacing_secs(&self) -> i64 {
        (self.tick_interval_ms / 1_000).max(1) as i64
    }

    /// Apply `FINANCE_WARS_BIND_ADDR`, `PORT` and `FINANCE_WARS_SEED` from
    /// the environment. `PORT` only replaces the port of `bind_addr`.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(addr) = lookup("FINANCE_WARS_BIND_ADDR").filter(|s| !s.trim().is_empty()) {
            self.bind_addr = addr.trim().to_string();
        } else if let Some(port) = lookup("PORT").and_then(|p| p.trim().parse::<u16>().ok()) {
            let host = self
                .bind_addr
                .rsplit_once(':')
                .map_or("0.0.0.0", |(host, _)| host)
                .to_string();
            self.bind_addr = format!("{host}:{port}");
        }

        if let Some(seed) = lookup("FINANCE_WARS_SEED").and_then(|s| s.trim().parse::<u64>().ok()) {
            self.rng_seed = Some(seed);
        }
    }
}
