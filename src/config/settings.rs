//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//!
//! API keys are never written to disk.  They are read from the environment
//! at startup by [`AppConfig::apply_env`].

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Deserializer, Serialize};

use super::AppPaths;
use crate::podcast::{AudioEncoding, PodcastLength};

/// Environment variable holding the Gemini script-generation key.
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";
/// Environment variable holding the OpenAI script-generation key.
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable holding the speech-synthesis key.
pub const TTS_API_KEY_VAR: &str = "GEMINI_TTS_API_KEY";

// ---------------------------------------------------------------------------
// ScriptProvider
// ---------------------------------------------------------------------------

/// Selects which language-model backend writes the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScriptProvider {
    /// Google Gemini `generateContent` API.
    Gemini,
    /// Any OpenAI-compatible `/v1/chat/completions` endpoint.
    OpenAi,
}

impl ScriptProvider {
    /// Every provider, in the order the UI lists them.
    pub const ALL: [ScriptProvider; 2] = [ScriptProvider::Gemini, ScriptProvider::OpenAi];

    /// Display name shown on the provider picker.
    pub fn label(&self) -> &'static str {
        match self {
            ScriptProvider::Gemini => "Google Gemini",
            ScriptProvider::OpenAi => "OpenAI",
        }
    }

    /// Environment variable the provider's key is read from.
    pub fn env_var(&self) -> &'static str {
        match self {
            ScriptProvider::Gemini => GEMINI_API_KEY_VAR,
            ScriptProvider::OpenAi => OPENAI_API_KEY_VAR,
        }
    }
}

impl Default for ScriptProvider {
    fn default() -> Self {
        Self::Gemini
    }
}

// ---------------------------------------------------------------------------
// ProviderConfig
// ---------------------------------------------------------------------------

/// Connection settings for one script-generation backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the API endpoint, without a trailing slash.
    pub base_url: String,
    /// API key.  Filled from the environment, never serialised.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Model identifier sent to the API (e.g. `"gemini-pro"`).
    pub model: String,
    /// Sampling temperature (0.0 – 1.0).
    pub temperature: f32,
    /// Maximum seconds to wait for a completion.
    pub timeout_secs: u64,
}

impl ProviderConfig {
    /// Default Gemini settings.
    pub fn gemini() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".into(),
            api_key: None,
            model: "gemini-pro".into(),
            temperature: 0.7,
            timeout_secs: 60,
        }
    }

    /// Default OpenAI settings.
    pub fn openai() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            api_key: None,
            model: "gpt-3.5-turbo".into(),
            temperature: 0.7,
            timeout_secs: 60,
        }
    }

    /// The API key, if one is set and non-blank.
    pub fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

/// A provider table as written in `settings.toml`; absent keys keep the
/// provider's defaults.
#[derive(Deserialize)]
struct ProviderTable {
    base_url: Option<String>,
    #[serde(default)]
    api_key: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    timeout_secs: Option<u64>,
}

impl ProviderTable {
    fn over(self, base: ProviderConfig) -> ProviderConfig {
        ProviderConfig {
            base_url: self.base_url.unwrap_or(base.base_url),
            api_key: self.api_key.or(base.api_key),
            model: self.model.unwrap_or(base.model),
            temperature: self.temperature.unwrap_or(base.temperature),
            timeout_secs: self.timeout_secs.unwrap_or(base.timeout_secs),
        }
    }
}

fn gemini_table<'de, D: Deserializer<'de>>(d: D) -> Result<ProviderConfig, D::Error> {
    ProviderTable::deserialize(d).map(|t| t.over(ProviderConfig::gemini()))
}

fn openai_table<'de, D: Deserializer<'de>>(d: D) -> Result<ProviderConfig, D::Error> {
    ProviderTable::deserialize(d).map(|t| t.over(ProviderConfig::openai()))
}

// ---------------------------------------------------------------------------
// ScriptConfig
// ---------------------------------------------------------------------------

/// Settings for the script-generation step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    /// Provider preselected in the UI.
    pub provider: ScriptProvider,
    /// Gemini connection settings.
    #[serde(deserialize_with = "gemini_table")]
    pub gemini: ProviderConfig,
    /// OpenAI connection settings.
    #[serde(deserialize_with = "openai_table")]
    pub openai: ProviderConfig,
}

impl ScriptConfig {
    /// Connection settings for `provider`.
    pub fn provider_config(&self, provider: ScriptProvider) -> &ProviderConfig {
        match provider {
            ScriptProvider::Gemini => &self.gemini,
            ScriptProvider::OpenAi => &self.openai,
        }
    }
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            provider: ScriptProvider::default(),
            gemini: ProviderConfig::gemini(),
            openai: ProviderConfig::openai(),
        }
    }
}

// ---------------------------------------------------------------------------
// VoiceConfig / SpeechConfig
// ---------------------------------------------------------------------------

/// Voice gender requested from the synthesis provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SsmlGender {
    Male,
    Female,
    Neutral,
}

/// Fixed voice parameters sent with every synthesis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// BCP-47 language code (e.g. `"en-US"`).
    pub language_code: String,
    /// Provider voice identity (e.g. `"en-US-Neural2-D"`).
    pub name: String,
    /// Serialised as `MALE`, `FEMALE` or `NEUTRAL`.
    pub ssml_gender: SsmlGender,
    /// Output encoding requested from the provider.
    pub audio_encoding: AudioEncoding,
    /// 0.25 – 4.0; 1.0 is the voice's natural rate.
    pub speaking_rate: f32,
    /// Semitones, -20.0 – 20.0.
    pub pitch: f32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            language_code: "en-US".into(),
            name: "en-US-Neural2-D".into(),
            ssml_gender: SsmlGender::Male,
            audio_encoding: AudioEncoding::Mp3,
            speaking_rate: 1.0,
            pitch: 0.0,
        }
    }
}

/// Settings for the speech-synthesis step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Base URL of the text-to-speech API.
    pub base_url: String,
    /// API key.  Filled from the environment, never serialised.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Maximum seconds to wait for synthesis.
    pub timeout_secs: u64,
    /// Voice parameters.
    pub voice: VoiceConfig,
}

impl SpeechConfig {
    /// The API key, if one is set and non-blank.
    pub fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            base_url: "https://texttospeech.googleapis.com".into(),
            api_key: None,
            timeout_secs: 120,
            voice: VoiceConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Window and download preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Initial inner window size `(width, height)` in points.
    pub window_size: (f32, f32),
    /// Length preselected on the length picker.
    pub default_length: PodcastLength,
    /// Where downloaded episodes are written.  `None` means the platform
    /// download directory.
    pub download_dir: Option<PathBuf>,
}

impl UiConfig {
    /// The configured download directory, or the platform default.
    pub fn resolved_download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .unwrap_or_else(|| AppPaths::new().downloads_dir)
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_size: (480.0, 640.0),
            default_length: PodcastLength::default(),
            download_dir: None,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use podcast_studio::config::AppConfig;
///
/// // Load (returns Default when file is missing), then pull keys from env.
/// let mut config = AppConfig::load().unwrap();
/// config.apply_env();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Script-generation settings.
    pub script: ScriptConfig,
    /// Speech-synthesis settings.
    pub speech: SpeechConfig,
    /// UI settings.
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Fill API keys from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// Fill API keys using `lookup` in place of `std::env::var`.
    ///
    /// A non-blank value from `lookup` replaces whatever the file held.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = read(GEMINI_API_KEY_VAR) {
            self.script.gemini.api_key = Some(key);
        }
        if let Some(key) = read(OPENAI_API_KEY_VAR) {
            self.script.openai.api_key = Some(key);
        }
        if let Some(key) = read(TTS_API_KEY_VAR) {
            self.speech.api_key = Some(key);
        }
    }

    /// Names of the environment variables whose credentials are missing.
    ///
    /// Used at startup to warn early; the actual failure is reported on first
    /// use of the affected backend.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        for provider in ScriptProvider::ALL {
            if self.script.provider_config(provider).credential().is_none() {
                missing.push(provider.env_var());
            }
        }
        if self.speech.credential().is_none() {
            missing.push(TTS_API_KEY_VAR);
        }
        missing
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
