//! Core `SpeechSynthesizer` trait and its error type.

use async_trait::async_trait;
use thiserror::Error;

use crate::http::StatusError;
use crate::podcast::AudioClip;

// ---------------------------------------------------------------------------
// TtsError
// ---------------------------------------------------------------------------

/// Errors that can occur during speech synthesis.
#[derive(Debug, Error)]
pub enum TtsError {
    /// No API key is configured for the synthesis service.
    #[error("speech synthesis API key not configured (set {env_var})")]
    MissingApiKey { env_var: &'static str },

    /// Nothing to synthesise.
    #[error("script is empty")]
    EmptyScript,

    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("speech synthesis timed out")]
    Timeout,

    /// The provider answered with a non-success status.
    #[error(transparent)]
    Status(#[from] StatusError),

    /// The response body did not match the provider's schema.
    #[error("failed to parse synthesis response: {0}")]
    Parse(String),

    /// `audioContent` was not valid base64.
    #[error("audio payload is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    /// The provider returned zero bytes of audio.
    #[error("synthesis returned no audio")]
    EmptyAudio,
}

impl From<reqwest::Error> for TtsError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TtsError::Timeout
        } else {
            TtsError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechSynthesizer trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for text-to-speech backends.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Convert `script` to audio.  No retries.
    async fn synthesize(&self, script: &str) -> Result<AudioClip, TtsError>;
}

// Compile-time assertion: Box<dyn SpeechSynthesizer> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SpeechSynthesizer>) {}
};
