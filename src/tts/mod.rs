//! Speech synthesis: script text in, encoded audio out.
//!
//! * [`SpeechSynthesizer`] — async trait implemented by all TTS backends.
//! * [`GoogleTtsSynthesizer`] — Google Cloud Text-to-Speech backend.
//! * [`TtsError`] — error variants for synthesis.

pub mod google;
pub mod synthesizer;

pub use google::GoogleTtsSynthesizer;
pub use synthesizer::{SpeechSynthesizer, TtsError};
