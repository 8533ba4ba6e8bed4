// =============================================================================
// Mentor — LLM-backed trading coach with a templated fallback
// =============================================================================
//
// The player's question and game context are folded into one prompt and sent
// to Gemini's `generateContent` endpoint. Any failure (missing key, network,
// non-2xx, unexpected body) yields the templated reply instead, so the chat
// always gets an answer.
//
// SECURITY: the API key is sent as a query parameter and never logged.
// =============================================================================

use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, instrument, warn};

use crate::runtime_config::MentorSettings;
use crate::types::LearningMode;

/// Game context sent alongside a mentor question.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MentorContext {
    #[serde(default, alias = "learningMode")]
    pub learning_mode: LearningMode,
    #[serde(default)]
    pub pnl: f64,
    /// Display name of the selected stock, if any.
    #[serde(default)]
    pub stock: Option<String>,
}

#[derive(Clone)]
pub struct MentorClient {
    api_key: Option<String>,
    settings: MentorSettings,
    client: reqwest::Client,
}

impl MentorClient {
    pub fn new(settings: MentorSettings, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs.max(1)))
            .build()
            .context("failed to build mentor HTTP client")?;

        let api_key = api_key.filter(|k| !k.trim().is_empty());
        debug!(model = %settings.model, has_key = api_key.is_some(), "MentorClient initialised");

        Ok(Self {
            api_key,
            settings,
            client,
        })
    }

    /// Answer `message`, falling back to [`fallback_reply`] on any failure.
    pub async fn reply(&self, message: &str, ctx: &MentorContext) -> String {
        match self.generate(message, ctx).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "mentor model unavailable, using fallback reply");
                fallback_reply(ctx)
            }
        }
    }

    /// POST {base}/v1beta/models/{model}:generateContent
    #[instrument(skip_all, name = "mentor::generate")]
    pub async fn generate(&self, message: &str, ctx: &MentorContext) -> Result<String> {
        let Some(key) = self.api_key.as_deref() else {
            bail!("GEMINI_API_KEY is not configured");
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": build_prompt(message, ctx) }] }]
        });

        let resp = self
            .client
            .post(&url)
            .query(&[("key", key)])
            .json(&body)
            .send()
            .await
            .context("generateContent request failed")?;

        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse generateContent response")?;

        if !status.is_success() {
            bail!("generateContent returned HTTP {status}: {}", body["error"]["message"]);
        }

        extract_text(&body).context("generateContent response had no text")
    }
}

/// Pull `candidates[0].content.parts[*].text` out of a Gemini response.
fn extract_text(body: &serde_json::Value) -> Option<String> {
    let parts = body["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

pub fn build_prompt(message: &str, ctx: &MentorContext) -> String {
    format!(
        "You are a professional stock market mentor for Indian stock market traders.\n\
         \n\
         User details:\n\
         - Learning mode: {mode}\n\
         - Profit/Loss: ₹{pnl}\n\
         - Selected stock: {stock}\n\
         \n\
         User question:\n\
         \"{message}\"\n\
         \n\
         Rules:\n\
         - Be friendly and human\n\
         - No financial guarantees\n\
         - Practical advice only for Indian stock market\n\
         - Beginner friendly if learning mode is beginner\n\
         - Focus on risk management and discipline\n\
         - Provide actionable insights\n",
        mode = ctx.learning_mode,
        pnl = ctx.pnl,
        stock = ctx.stock.as_deref().unwrap_or("None"),
    )
}

/// Guidance returned when the model cannot be reached.
pub fn fallback_reply(ctx: &MentorContext) -> String {
    format!(
        "I'm currently unable to access advanced AI analysis. \
         Here's my guidance based on your situation:\n\
         \n\
         • Learning Mode: {mode}\n\
         • P/L: ₹{pnl}\n\
         • Stock: {stock}\n\
         \n\
         For better decisions:\n\
         1. Check the 5-year chart for trends\n\
         2. Monitor support/resistance levels\n\
         3. Set stop-loss at 5-10% for beginners\n\
         4. Book partial profits at 15-20% gains\n\
         \n\
         Risk management is key to long-term success!",
        mode = ctx.learning_mode,
        pnl = ctx.pnl,
        stock = ctx.stock.as_deref().unwrap_or("Not selected"),
    )
}
