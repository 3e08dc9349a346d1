//! Podcast Studio — turn a topic into a narrated podcast episode.
//!
//! The user enters a topic, picks a target length, reviews (and optionally
//! edits) a script written by a language model, then has it narrated by a
//! speech-synthesis service and plays or downloads the result.
//!
//! # Modules
//!
//! * [`config`]     — settings file, API keys, platform paths.
//! * [`podcast`]    — lengths, the podcast record, audio clips.
//! * [`llm`]        — prompt construction and script generators.
//! * [`tts`]        — speech synthesis.
//! * [`generation`] — the generation client and background worker.
//! * [`workflow`]   — the four-step state machine.
//! * [`player`]     — in-app playback.
//! * [`app`]        — the egui window.

pub mod app;
pub mod config;
pub mod generation;
pub mod llm;
pub mod player;
pub mod podcast;
pub mod tts;
pub mod workflow;

pub mod http;

#[cfg(test)]
mod test_support;
