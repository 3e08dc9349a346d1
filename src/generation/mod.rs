//! Generation client: script generation, speech synthesis and the
//! background worker that runs them off the UI thread.
//!
//! * [`GenerationClient`] — one-shot `generate_script` / `synthesize_audio`
//!   / `generate_podcast` calls.
//! * [`run_worker`] — tokio task serving [`GenerationCommand`]s.
//! * [`GenerationError`] — validation / configuration / service failures.

pub mod client;
pub mod error;
pub mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use client::GenerationClient;
pub use error::GenerationError;
pub use worker::{
    execute, run_worker, AudioRequest, GenerationCommand, GenerationOutcome, PodcastRequest,
    RequestId, ScriptRequest,
};
