use anyhow::{anyhow, Context, Result};
use std::time::Duration;

use crate::narrative::{NarrativeRequest, NarrativeSections, NarrativeSource};
use crate::prompt;

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl OpenAiConfig {
    /// Resolve the remote configuration from an explicit key or the
    /// environment. `None` means no credentials: stay local.
    pub fn from_credentials(api_key: Option<String>) -> Option<Self> {
        let api_key = api_key
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|key| !key.is_empty())?;

        Some(Self {
            api_key,
            model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            endpoint: std::env::var("OPENAI_CHAT_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }
}

pub struct OpenAiSource {
    config: OpenAiConfig,
    agent: ureq::Agent,
}

impl OpenAiSource {
    pub fn new(config: OpenAiConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Self { config, agent }
    }
}

impl NarrativeSource for OpenAiSource {
    fn narrate(&self, req: &NarrativeRequest) -> Result<NarrativeSections> {
        let body = serde_json::json!({
            "model": self.config.model,
            "temperature": 0.7,
            "response_format": {"type": "json_object"},
            "messages": [
                {"role": "system", "content": prompt::SYSTEM_PROMPT},
                {"role": "user", "content": prompt::attacker_profile_prompt(req)}
            ]
        });

        let response: serde_json::Value = self
            .agent
            .post(&self.config.endpoint)
            .set("Authorization", &format!("Bearer {}", self.config.api_key))
            .send_json(body)
            .context("Chat completion request failed")?
            .into_json()
            .context("Chat completion response was not JSON")?;

        sections_from_response(&response)
    }
}

/// Pull the three narrative sections out of a chat-completion response.
/// The model is instructed to reply with a JSON object holding exactly the
/// section keys; anything else counts as a remote failure.
pub fn sections_from_response(response: &serde_json::Value) -> Result<NarrativeSections> {
    let content = response["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| anyhow!("Chat completion response missing message content"))?;

    serde_json::from_str(content).context("Model reply did not contain the three requested sections")
}
