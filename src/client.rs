// =============================================================================
// Backend Client — game-side calls to the server with local fallbacks
// =============================================================================
//
// Each call has a `try_*` form that surfaces the error and a plain form that
// never fails: on any error it logs a warning and returns same-shaped data
// built locally (a simulated history, a templated mentor line, or the
// bundled quiz bank).
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument, warn};

use crate::market_data::PriceSeries;
use crate::mentor::MentorContext;
use crate::quiz::{questions_for_level, QuizQuestion};
use crate::runtime_config::RuntimeConfig;
use crate::simulator::PriceSimulator;

#[derive(Deserialize)]
struct MentorResponse {
    reply: String,
}

#[derive(Clone)]
pub struct BackendClient {
    base_url: String,
    client: reqwest::Client,
    fallback_sim: Arc<Mutex<PriceSimulator>>,
}

impl BackendClient {
    /// `seed` fixes the simulator used for fallback histories.
    pub fn new(base_url: impl Into<String>, timeout: Duration, seed: Option<u64>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build backend HTTP client")?;

        debug!(base_url = %base_url, "BackendClient initialised");

        Ok(Self {
            base_url,
            client,
            fallback_sim: Arc::new(Mutex::new(PriceSimulator::with_optional_seed(seed))),
        })
    }

    /// Client for `config.backend_url`, sharing the mentor request timeout
    /// and the simulator seed.
    pub fn from_config(config: &RuntimeConfig) -> Result<Self> {
        Self::new(
            config.backend_url.clone(),
            Duration::from_secs(config.mentor.timeout_secs.max(1)),
            config.rng_seed,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -------------------------------------------------------------------------
    // Historical series
    // -------------------------------------------------------------------------

    /// GET /api/real-stock-analysis/{symbol}
    #[instrument(skip(self), name = "backend::fetch_history")]
    pub async fn try_fetch_history(&self, symbol: &str) -> Result<PriceSeries> {
        let url = format!("{}/api/real-stock-analysis/{}", self.base_url, symbol);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("GET /api/real-stock-analysis request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body: serde_json::Value = resp.json().await.unwrap_or_default();
            let message = body["message"].as_str().unwrap_or("failed to fetch data");
            bail!("history request returned HTTP {status}: {message}");
        }

        let series: PriceSeries = resp
            .json()
            .await
            .context("failed to parse history response")?;

        if series.is_empty() {
            bail!("no data available for {symbol}");
        }
        Ok(series)
    }

    /// History for `symbol`, or a locally simulated series ending at
    /// `reference_price` when the server cannot provide one.
    pub async fn fetch_history(&self, symbol: &str, reference_price: f64) -> PriceSeries {
        match self.try_fetch_history(symbol).await {
            Ok(series) => series,
            Err(e) => {
                warn!(symbol, error = %e, "history unavailable, generating synthetic series");
                self.fallback_sim.lock().generate_history(reference_price)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Mentor
    // -------------------------------------------------------------------------

    /// POST /mentor-chat
    #[instrument(skip_all, name = "backend::mentor_chat")]
    pub async fn try_mentor_chat(&self, message: &str, ctx: &MentorContext) -> Result<String> {
        let url = format!("{}/mentor-chat", self.base_url);

        let resp = self
            .client
            .post(&url)
            .json(&json!({ "message": message, "context": ctx }))
            .send()
            .await
            .context("POST /mentor-chat request failed")?;

        let status = resp.status();
        if !status.is_success() {
            bail!("mentor request returned HTTP {status}");
        }

        let body: MentorResponse = resp
            .json()
            .await
            .context("failed to parse mentor response")?;
        Ok(body.reply)
    }

    pub async fn mentor_chat(&self, message: &str, ctx: &MentorContext) -> String {
        match self.try_mentor_chat(message, ctx).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "mentor chat unavailable, using local reply");
                offline_mentor_reply(ctx)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Quiz
    // -------------------------------------------------------------------------

    /// POST /generate-quiz
    #[instrument(skip(self), name = "backend::generate_quiz")]
    pub async fn try_generate_quiz(&self, level: &str) -> Result<Vec<QuizQuestion>> {
        let url = format!("{}/generate-quiz", self.base_url);

        let resp = self
            .client
            .post(&url)
            .json(&json!({ "level": level }))
            .send()
            .await
            .context("POST /generate-quiz request failed")?;

        let status = resp.status();
        if !status.is_success() {
            bail!("quiz request returned HTTP {status}");
        }

        resp.json().await.context("failed to parse quiz response")
    }

    pub async fn generate_quiz(&self, level: &str) -> Vec<QuizQuestion> {
        match self.try_generate_quiz(level).await {
            Ok(questions) => questions,
            Err(e) => {
                warn!(level, error = %e, "quiz service unavailable, using bundled questions");
                questions_for_level(level)
            }
        }
    }
}

/// Mentor line shown when the server itself is unreachable.
pub fn offline_mentor_reply(ctx: &MentorContext) -> String {
    format!(
        "I'm here to help! Based on your {} level and ₹{} P/L, focus on risk \
         management and check the 5-year chart for trends.",
        ctx.learning_mode, ctx.pnl
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::PricePoint;
    use crate::simulator::HISTORY_POINTS;
    use crate::types::LearningMode;

    // Port 9 (discard) is never served in the test environment.
    fn offline() -> BackendClient {
        BackendClient::new("http://127.0.0.1:9/", Duration::from_secs(2), Some(11)).unwrap()
    }

    #[test]
    fn base_url_is_normalised() {
        assert_eq!(offline().base_url(), "http://127.0.0.1:9");
    }

    #[tokio::test]
    async fn from_config_uses_backend_url_and_seed() {
        let config = RuntimeConfig {
            backend_url: "http://127.0.0.1:9/".to_string(),
            rng_seed: Some(11),
            ..RuntimeConfig::default()
        };
        let client = BackendClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:9");

        // Same seed as `offline()`, so the fallback series match.
        let a = client.fetch_history("INFY", 1_550.0).await;
        let b = offline().fetch_history("INFY", 1_550.0).await;
        assert_eq!(a, b);

        let default_client = BackendClient::from_config(&RuntimeConfig::default()).unwrap();
        assert_eq!(default_client.base_url(), "http://localhost:5000");
    }

    #[tokio::test]
    async fn history_falls_back_to_simulation() {
        let client = offline();
        assert!(client.try_fetch_history("TCS").await.is_err());

        let series = client.fetch_history("TCS", 3_800.0).await;
        assert_eq!(series.len(), HISTORY_POINTS);
        assert_eq!(series.last().map(|p| p.close), Some(3_800.0));
        assert!(series.iter().all(PricePoint::is_consistent));
    }

    #[tokio::test]
    async fn mentor_falls_back_to_template() {
        let ctx = MentorContext {
            learning_mode: LearningMode::Advanced,
            pnl: 250.0,
            stock: None,
        };
        let reply = offline().mentor_chat("what now?", &ctx).await;
        assert_eq!(
            reply,
            "I'm here to help! Based on your advanced level and ₹250 P/L, focus on risk \
             management and check the 5-year chart for trends."
        );
    }

    #[tokio::test]
    async fn quiz_falls_back_to_bundled_bank() {
        let client = offline();
        assert_eq!(client.generate_quiz("beginner").await.len(), 5);
        assert_eq!(client.generate_quiz("advanced").await.len(), 3);
        assert!(client.generate_quiz("expert").await.is_empty());
    }
}
