//! In-memory generator and synthesizer doubles for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::llm::{LlmError, PromptBuilder, ScriptGenerator};
use crate::podcast::{AudioClip, AudioEncoding, PodcastLength};
use crate::tts::{SpeechSynthesizer, TtsError};

/// Always returns the same script and remembers what it was asked for.
pub struct FixedGenerator {
    script: String,
    calls: Mutex<Vec<(String, PodcastLength)>>,
    prompts: Mutex<Vec<String>>,
}

impl FixedGenerator {
    pub fn new(script: &str) -> Self {
        Self {
            script: script.to_string(),
            calls: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, PodcastLength)> {
        self.calls.lock().unwrap().clone()
    }

    /// The prompts a real provider would have received.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScriptGenerator for FixedGenerator {
    async fn generate(&self, topic: &str, length: PodcastLength) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push((topic.to_string(), length));
        self.prompts
            .lock()
            .unwrap()
            .push(PromptBuilder::new().build(topic, length));
        Ok(self.script.clone())
    }
}

/// Fails every call with the error produced by `make_error`.
pub struct FailingGenerator {
    make_error: fn() -> LlmError,
}

impl FailingGenerator {
    pub fn new(make_error: fn() -> LlmError) -> Self {
        Self { make_error }
    }
}

#[async_trait]
impl ScriptGenerator for FailingGenerator {
    async fn generate(&self, _topic: &str, _length: PodcastLength) -> Result<String, LlmError> {
        Err((self.make_error)())
    }
}

/// Hangs on its first call for `stall`, then answers every later call at once.
pub struct StallingGenerator {
    script: String,
    stall: Duration,
    calls: AtomicUsize,
}

impl StallingGenerator {
    pub fn new(script: &str, stall: Duration) -> Self {
        Self {
            script: script.to_string(),
            stall,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScriptGenerator for StallingGenerator {
    async fn generate(&self, _topic: &str, _length: PodcastLength) -> Result<String, LlmError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            tokio::time::sleep(self.stall).await;
        }
        Ok(self.script.clone())
    }
}

/// Decodes a fixed base64 payload, or fails with a fixed error.
pub struct FixedSynthesizer {
    outcome: Result<String, fn() -> TtsError>,
    calls: Mutex<Vec<String>>,
}

impl FixedSynthesizer {
    pub fn base64(payload: &str) -> Self {
        Self {
            outcome: Ok(payload.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(make_error: fn() -> TtsError) -> Self {
        Self {
            outcome: Err(make_error),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechSynthesizer for FixedSynthesizer {
    async fn synthesize(&self, script: &str) -> Result<AudioClip, TtsError> {
        self.calls.lock().unwrap().push(script.to_string());
        match &self.outcome {
            Ok(payload) => Ok(AudioClip::new(BASE64.decode(payload)?, AudioEncoding::Mp3)),
            Err(make_error) => Err(make_error()),
        }
    }
}
