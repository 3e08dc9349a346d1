//! Script generation for Podcast Studio.
//!
//! This module provides:
//! * [`ScriptGenerator`] — async trait implemented by all script backends.
//! * [`GeminiGenerator`] — Google Gemini `generateContent` backend.
//! * [`OpenAiGenerator`] — OpenAI-compatible chat-completions backend.
//! * [`PromptBuilder`] — builds the topic + length instruction.
//! * [`LlmError`] — error variants for script generation.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use podcast_studio::config::AppConfig;
//! use podcast_studio::llm::{GeminiGenerator, ScriptGenerator};
//! use podcast_studio::podcast::PodcastLength;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut config = AppConfig::default();
//!     config.apply_env();
//!
//!     let generator = GeminiGenerator::from_config(&config.script.gemini);
//!     let script = generator
//!         .generate("The history of space exploration", PodcastLength::TwoMinutes)
//!         .await
//!         .unwrap();
//!     println!("{script}");
//! }
//! ```

pub mod gemini;
pub mod generator;
pub mod openai;
pub mod prompt;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use gemini::GeminiGenerator;
pub use generator::{LlmError, ScriptGenerator};
pub use openai::OpenAiGenerator;
pub use prompt::PromptBuilder;
