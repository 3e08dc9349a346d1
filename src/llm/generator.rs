//! Core `ScriptGenerator` trait and the error type shared by its backends.

use async_trait::async_trait;
use thiserror::Error;

use crate::http::StatusError;
use crate::podcast::PodcastLength;

// ---------------------------------------------------------------------------
// LlmError
// ---------------------------------------------------------------------------

/// Errors that can occur during script generation.
#[derive(Debug, Error)]
pub enum LlmError {
    /// No API key is configured for the selected provider.  Raised before
    /// any network I/O.
    #[error("{provider} API key not configured (set {env_var})")]
    MissingApiKey {
        provider: &'static str,
        env_var: &'static str,
    },

    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("script generation timed out")]
    Timeout,

    /// The provider answered with a non-success status.
    #[error(transparent)]
    Status(#[from] StatusError),

    /// The response body did not match the provider's schema.
    #[error("failed to parse provider response: {0}")]
    Parse(String),

    /// The response parsed but held no usable completion text.
    #[error("provider returned an empty script")]
    EmptyResponse,
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// ScriptGenerator trait
// ---------------------------------------------------------------------------

/// Async trait for language-model script generation.
///
/// Implementors must be `Send + Sync` so they can be shared across threads
/// (e.g. wrapped in `Arc<dyn ScriptGenerator>`).
#[async_trait]
pub trait ScriptGenerator: Send + Sync {
    /// Write a script about `topic` sized for `length`.
    ///
    /// Returns the single best completion, trimmed.  No retries.
    async fn generate(&self, topic: &str, length: PodcastLength) -> Result<String, LlmError>;
}

/// Trim a completion and reject it when nothing is left.
pub(crate) fn non_empty_completion(text: &str) -> Result<String, LlmError> {
    let text = text.trim();
    if text.is_empty() {
        Err(LlmError::EmptyResponse)
    } else {
        Ok(text.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
