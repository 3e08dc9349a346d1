//! The error taxonomy the workflow surfaces to the user.
//!
//! Provider errors ([`LlmError`], [`TtsError`]) are folded into three kinds:
//!
//! | Kind            | Cause                               | Network call made |
//! |-----------------|-------------------------------------|-------------------|
//! | `Validation`    | empty topic / empty script          | no                |
//! | `Configuration` | missing credential or provider      | no                |
//! | `Service`       | transport, status, malformed reply  | yes               |

use thiserror::Error;

use crate::llm::LlmError;
use crate::tts::TtsError;

/// A failed generation step, carrying the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    Service(String),
}

impl GenerationError {
    /// Message used when the topic is blank.
    pub fn empty_topic() -> Self {
        GenerationError::Validation("Please enter a topic for your podcast".into())
    }

    /// Message used when the script to synthesise is blank.
    pub fn empty_script() -> Self {
        GenerationError::Validation("The script is empty. Write something to narrate".into())
    }
}

impl From<LlmError> for GenerationError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::MissingApiKey { .. } => GenerationError::Configuration(e.to_string()),
            other => GenerationError::Service(format!(
                "Failed to generate script: {other}. Please try again."
            )),
        }
    }
}

impl From<TtsError> for GenerationError {
    fn from(e: TtsError) -> Self {
        match e {
            TtsError::MissingApiKey { .. } => GenerationError::Configuration(e.to_string()),
            TtsError::EmptyScript => GenerationError::empty_script(),
            other => GenerationError::Service(format!(
                "Failed to generate audio: {other}. Please try again."
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::StatusError;

    #[test]
    fn missing_llm_key_is_configuration() {
        let err: GenerationError = LlmError::MissingApiKey {
            provider: "OpenAI",
            env_var: "OPENAI_API_KEY",
        }
        .into();
        assert!(matches!(err, GenerationError::Configuration(ref m) if m.contains("OPENAI_API_KEY")));
    }

    #[test]
    fn llm_transport_failure_is_service() {
        let err: GenerationError = LlmError::Timeout.into();
        assert!(matches!(err, GenerationError::Service(ref m) if m.starts_with("Failed to generate script")));
    }

    #[test]
    fn llm_status_failure_is_service() {
        let err: GenerationError = LlmError::Status(StatusError {
            status: 401,
            body: "bad key".into(),
        })
        .into();
        assert!(matches!(err, GenerationError::Service(ref m) if m.contains("401")));
    }

    #[test]
    fn missing_tts_key_is_configuration() {
        let err: GenerationError = TtsError::MissingApiKey {
            env_var: "GEMINI_TTS_API_KEY",
        }
        .into();
        assert!(matches!(err, GenerationError::Configuration(_)));
    }

    #[test]
    fn empty_tts_script_is_validation() {
        let err: GenerationError = TtsError::EmptyScript.into();
        assert_eq!(err, GenerationError::empty_script());
    }

    #[test]
    fn tts_parse_failure_is_service() {
        let err: GenerationError = TtsError::Parse("no audioContent".into()).into();
        assert!(matches!(err, GenerationError::Service(ref m) if m.starts_with("Failed to generate audio")));
    }

    #[test]
    fn display_is_the_bare_message() {
        assert_eq!(
            GenerationError::empty_topic().to_string(),
            "Please enter a topic for your podcast"
        );
    }
}
