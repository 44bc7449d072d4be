//! Optional LLM summary capability
//!
//! A profile summary is a nicety, never a requirement: the trait returns
//! `Option<String>` and every failure mode (missing key, network error,
//! malformed response) collapses to `None`. The capability is constructed by
//! the composition root only when a key is configured and passed in
//! explicitly; nothing in this module reads ambient process state.

use async_trait::async_trait;
use tracing::debug;

use crate::config::SummaryConfig;
use crate::types::ScrapedProfile;

/// Chat completion endpoint (OpenAI-compatible).
const CHAT_COMPLETIONS_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// A capability that can turn a profile into a short prose summary.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize a profile. `None` means "no summary", never an error.
    async fn summarize(&self, entry_name: &str, profile: &ScrapedProfile) -> Option<String>;
}

/// Summarizer backed by Groq's chat completion API.
pub struct GroqSummarizer {
    client: reqwest::Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl GroqSummarizer {
    /// Build from configuration; `None` when no API key is configured.
    pub fn from_config(config: &SummaryConfig) -> Option<Self> {
        let api_key = config.api_key.clone()?;
        Some(Self {
            client: reqwest::Client::new(),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    fn prompt(entry_name: &str, profile: &ScrapedProfile) -> String {
        let data = serde_json::to_string_pretty(profile).unwrap_or_default();
        format!(
            "You are a fragrance expert. Based on the following data about \
             \"{entry_name}\", provide a brief, engaging description in 2-3 \
             sentences. Be concise and informative.\n\nData: {data}\n\n\
             Focus on the key notes and what kind of scent experience to expect."
        )
    }
}

#[async_trait]
impl Summarizer for GroqSummarizer {
    async fn summarize(&self, entry_name: &str, profile: &ScrapedProfile) -> Option<String> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": Self::prompt(entry_name, profile) }],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        let response = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            debug!("Summary request failed with status {}", response.status());
            return None;
        }

        let payload: serde_json::Value = response.json().await.ok()?;
        payload["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}
