//! Google Gemini script generator.
//!
//! Calls `{base_url}/v1/models/{model}:generateContent` with the flat prompt
//! from [`PromptBuilder::build`] and reads the first candidate's text.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::{ProviderConfig, ScriptProvider};
use crate::http::{client_with_timeout, ensure_success};
use crate::llm::generator::{non_empty_completion, LlmError, ScriptGenerator};
use crate::llm::prompt::PromptBuilder;
use crate::podcast::PodcastLength;

// ---------------------------------------------------------------------------
// Response schema
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Extract `candidates[0].content.parts[0].text` from a response body.
fn parse_response(body: &str) -> Result<String, LlmError> {
    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| LlmError::Parse(e.to_string()))?;

    let text = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::Parse("response has no candidates".into()))?
        .content
        .ok_or_else(|| LlmError::Parse("candidate has no content".into()))?
        .parts
        .into_iter()
        .next()
        .and_then(|p| p.text)
        .ok_or_else(|| LlmError::Parse("candidate content has no text part".into()))?;

    non_empty_completion(&text)
}

// ---------------------------------------------------------------------------
// GeminiGenerator
// ---------------------------------------------------------------------------

/// Script generator backed by the Gemini `generateContent` endpoint.
///
/// All connection details come from the [`ProviderConfig`] passed to
/// [`GeminiGenerator::from_config`].
pub struct GeminiGenerator {
    client: reqwest::Client,
    config: ProviderConfig,
    prompt_builder: PromptBuilder,
}

impl GeminiGenerator {
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self {
            client: client_with_timeout(config.timeout_secs),
            config: config.clone(),
            prompt_builder: PromptBuilder::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl ScriptGenerator for GeminiGenerator {
    async fn generate(&self, topic: &str, length: PodcastLength) -> Result<String, LlmError> {
        let key = self.config.credential().ok_or(LlmError::MissingApiKey {
            provider: ScriptProvider::Gemini.label(),
            env_var: ScriptProvider::Gemini.env_var(),
        })?;

        let prompt = self.prompt_builder.build(topic, length);
        let body = serde_json::json!({
            "contents": [
                { "parts": [ { "text": prompt } ] }
            ],
            "generationConfig": {
                "temperature": self.config.temperature,
                "candidateCount": 1
            }
        });

        log::debug!("gemini: requesting {} script for {topic:?}", length.id());

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{dead_url, serve_once, split_request};

    fn config(base_url: &str, api_key: Option<&str>) -> ProviderConfig {
        ProviderConfig {
            base_url: base_url.into(),
            api_key: api_key.map(String::from),
            ..ProviderConfig::gemini()
        }
    }

    const OK_BODY: &str = r#"{
        "candidates": [
            { "content": { "parts": [ { "text": "  Welcome to the show.  " } ], "role": "model" } }
        ]
    }"#;

    #[test]
    fn parses_first_candidate_text() {
        assert_eq!(parse_response(OK_BODY).unwrap(), "Welcome to the show.");
    }

    #[test]
    fn missing_candidates_is_parse_error() {
        let err = parse_response(r#"{"promptFeedback": {}}"#).unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }

    #[test]
    fn missing_text_is_parse_error() {
        let err = parse_response(r#"{"candidates": [{"content": {"parts": []}}]}"#).unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }

    #[test]
    fn blank_text_is_empty_response() {
        let err =
            parse_response(r#"{"candidates": [{"content": {"parts": [{"text": " "}]}}]}"#)
                .unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(parse_response("<html>"), Err(LlmError::Parse(_))));
    }

    #[test]
    fn endpoint_includes_model() {
        let generator = GeminiGenerator::from_config(&config("https://example.test/", None));
        assert_eq!(
            generator.endpoint(),
            "https://example.test/v1/models/gemini-pro:generateContent"
        );
    }

    #[tokio::test]
    async fn missing_key_fails_before_io() {
        // Nothing listens here; a network attempt would be a Request error.
        let generator = GeminiGenerator::from_config(&config(&dead_url().await, None));
        let err = generator
            .generate("Tea", PodcastLength::OneMinute)
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey { .. }));
    }

    #[tokio::test]
    async fn sends_prompt_with_bearer_key() {
        let (url, server) = serve_once(200, OK_BODY).await;
        let generator = GeminiGenerator::from_config(&config(&url, Some("gem-key")));

        let script = generator
            .generate("The history of space exploration", PodcastLength::TwoMinutes)
            .await
            .unwrap();
        assert_eq!(script, "Welcome to the show.");

        let raw = server.await.unwrap();
        let (head, body) = split_request(&raw);
        assert!(head.starts_with("post /v1/models/gemini-pro:generatecontent"));
        assert!(head.contains("authorization: bearer gem-key"));

        let json: serde_json::Value = serde_json::from_str(body).unwrap();
        let prompt = json["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("The history of space exploration"));
        assert!(prompt.contains("300"));
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let (url, server) = serve_once(429, r#"{"error": "quota"}"#).await;
        let generator = GeminiGenerator::from_config(&config(&url, Some("k")));

        let err = generator
            .generate("Tea", PodcastLength::OneMinute)
            .await
            .unwrap_err();
        server.await.unwrap();

        match err {
            LlmError::Status(status) => {
                assert_eq!(status.status, 429);
                assert!(status.body.contains("quota"));
            }
            other => panic!("expected Status, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_request_error() {
        let generator = GeminiGenerator::from_config(&config(&dead_url().await, Some("k")));
        let err = generator
            .generate("Tea", PodcastLength::OneMinute)
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Request(_) | LlmError::Timeout));
    }
}
