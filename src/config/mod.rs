//! Configuration module for Podcast Studio.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for script
//! generation, speech synthesis and the UI, `AppPaths` for cross-platform
//! directories, and TOML persistence via `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{
    AppConfig, ProviderConfig, ScriptConfig, ScriptProvider, SpeechConfig, SsmlGender, UiConfig,
    VoiceConfig, GEMINI_API_KEY_VAR, OPENAI_API_KEY_VAR, TTS_API_KEY_VAR,
};
