//! OpenAI-compatible script generator.
//!
//! `OpenAiGenerator` calls any `/v1/chat/completions` endpoint that speaks the
//! OpenAI wire format (OpenAI, Groq, Together.ai, LM Studio, vLLM …).
//! All connection details come from [`ProviderConfig`]; nothing is hardcoded.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::{ProviderConfig, ScriptProvider};
use crate::http::{client_with_timeout, ensure_success};
use crate::llm::generator::{non_empty_completion, LlmError, ScriptGenerator};
use crate::llm::prompt::PromptBuilder;
use crate::podcast::PodcastLength;

/// Token ceiling for one completion; fits the five-minute script.
const MAX_TOKENS: u32 = 1500;

// ---------------------------------------------------------------------------
// Response schema
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Extract `choices[0].message.content` from a response body.
fn parse_response(body: &str) -> Result<String, LlmError> {
    let response: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| LlmError::Parse(e.to_string()))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::Parse("response has no choices".into()))?
        .message
        .and_then(|m| m.content)
        .ok_or_else(|| LlmError::Parse("choice has no message content".into()))?;

    non_empty_completion(&content)
}

// ---------------------------------------------------------------------------
// OpenAiGenerator
// ---------------------------------------------------------------------------

/// Script generator backed by an OpenAI-compatible chat-completions API.
pub struct OpenAiGenerator {
    client: reqwest::Client,
    config: ProviderConfig,
    prompt_builder: PromptBuilder,
}

impl OpenAiGenerator {
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self {
            client: client_with_timeout(config.timeout_secs),
            config: config.clone(),
            prompt_builder: PromptBuilder::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ScriptGenerator for OpenAiGenerator {
    async fn generate(&self, topic: &str, length: PodcastLength) -> Result<String, LlmError> {
        let key = self.config.credential().ok_or(LlmError::MissingApiKey {
            provider: ScriptProvider::OpenAi.label(),
            env_var: ScriptProvider::OpenAi.env_var(),
        })?;

        let (system_msg, user_msg) = self.prompt_builder.build_chat(topic, length);

        let body = serde_json::json!({
            "model":       self.config.model,
            "messages": [
                { "role": "system", "content": system_msg },
                { "role": "user",   "content": user_msg   }
            ],
            "n":           1,
            "stream":      false,
            "temperature": self.config.temperature,
            "max_tokens":  MAX_TOKENS
        });

        log::debug!("openai: requesting {} script for {topic:?}", length.id());

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(key)
            .json(&body)
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let text = response.text().await?;

        parse_response(&text)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
