//! `GenerationClient` — script generation followed by speech synthesis.
//!
//! The client owns one [`ScriptGenerator`] per configured
//! [`ScriptProvider`] and a single [`SpeechSynthesizer`].  Every call is
//! attempted exactly once; failures are returned to the caller as a
//! [`GenerationError`].

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{AppConfig, ScriptProvider};
use crate::llm::{GeminiGenerator, OpenAiGenerator, ScriptGenerator};
use crate::podcast::{AudioClip, PodcastLength, PodcastRecord};
use crate::tts::{GoogleTtsSynthesizer, SpeechSynthesizer};

use super::error::GenerationError;

/// Cheap to clone (`Arc` clones); safe to move into spawned tasks.
#[derive(Clone)]
pub struct GenerationClient {
    generators: HashMap<ScriptProvider, Arc<dyn ScriptGenerator>>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
}

impl GenerationClient {
    /// A client with no script providers yet.  Add them with
    /// [`with_generator`](Self::with_generator).
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        Self {
            generators: HashMap::new(),
            synthesizer,
        }
    }

    /// Register (or replace) the generator used for `provider`.
    pub fn with_generator(
        mut self,
        provider: ScriptProvider,
        generator: Arc<dyn ScriptGenerator>,
    ) -> Self {
        self.generators.insert(provider, generator);
        self
    }

    /// Build the production client: Gemini, OpenAI and Google TTS.
    ///
    /// Missing credentials are not an error here; they surface as
    /// [`GenerationError::Configuration`] on first use.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(Arc::new(GoogleTtsSynthesizer::from_config(&config.speech)))
            .with_generator(
                ScriptProvider::Gemini,
                Arc::new(GeminiGenerator::from_config(&config.script.gemini)),
            )
            .with_generator(
                ScriptProvider::OpenAi,
                Arc::new(OpenAiGenerator::from_config(&config.script.openai)),
            )
    }

    /// `true` when a generator is registered for `provider`.
    pub fn supports(&self, provider: ScriptProvider) -> bool {
        self.generators.contains_key(&provider)
    }

    /// Ask `provider` for a script about `topic`.
    pub async fn generate_script(
        &self,
        topic: &str,
        length: PodcastLength,
        provider: ScriptProvider,
    ) -> Result<String, GenerationError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(GenerationError::empty_topic());
        }

        let generator = self.generators.get(&provider).ok_or_else(|| {
            GenerationError::Configuration(format!(
                "{} is not available as a script provider",
                provider.label()
            ))
        })?;

        log::info!(
            "generation: script via {} ({}) for {topic:?}",
            provider.label(),
            length.id()
        );

        let script = generator.generate(topic, length).await.map_err(|e| {
            log::error!("generation: script failed: {e}");
            GenerationError::from(e)
        })?;

        log::info!(
            "generation: script ready ({} words)",
            script.split_whitespace().count()
        );
        Ok(script)
    }

    /// Convert `script` to audio.
    pub async fn synthesize_audio(&self, script: &str) -> Result<AudioClip, GenerationError> {
        if script.trim().is_empty() {
            return Err(GenerationError::empty_script());
        }

        log::info!("generation: synthesising audio");

        let clip = self.synthesizer.synthesize(script).await.map_err(|e| {
            log::error!("generation: synthesis failed: {e}");
            GenerationError::from(e)
        })?;

        log::info!("generation: audio ready ({} bytes)", clip.len());
        Ok(clip)
    }

    /// Script then audio, back to back, with no review step.
    ///
    /// Synthesis is only attempted once the script has been generated.
    pub async fn generate_podcast(
        &self,
        topic: &str,
        length: PodcastLength,
        provider: ScriptProvider,
    ) -> Result<PodcastRecord, GenerationError> {
        let script = self.generate_script(topic, length, provider).await?;
        let mut record = PodcastRecord::new(topic, length, script)
            .map_err(|e| GenerationError::Service(e.to_string()))?;

        let clip = self.synthesize_audio(record.script()).await?;
        let script = record.script().to_string();
        record
            .attach_audio(script, clip)
            .map_err(|e| GenerationError::Service(e.to_string()))?;

        Ok(record)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
