//! The podcast record: one topic, one script, at most one audio clip.

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::audio::AudioClip;
use super::length::PodcastLength;

/// Titles longer than this are truncated with an ellipsis.
const MAX_TITLE_CHARS: usize = 60;

/// Errors raised when a record mutation would break its invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("topic must not be empty")]
    EmptyTopic,

    #[error("script must not be empty")]
    EmptyScript,

    /// Audio was already attached; the record is final.
    #[error("podcast already has audio and can no longer be changed")]
    Finalized,
}

/// Opaque per-record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PodcastId(Uuid);

impl PodcastId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PodcastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A generated episode.
///
/// Fields are private: the script can only change through
/// [`set_script`](Self::set_script) and the audio only through
/// [`attach_audio`](Self::attach_audio), both of which refuse once audio
/// exists.
#[derive(Debug, Clone)]
pub struct PodcastRecord {
    id: PodcastId,
    title: String,
    topic: String,
    script: String,
    audio: Option<AudioClip>,
    length: PodcastLength,
    length_label: String,
    created_at: DateTime<Utc>,
}

impl PodcastRecord {
    /// Create a record for a freshly generated script.
    pub fn new(topic: &str, length: PodcastLength, script: String) -> Result<Self, RecordError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(RecordError::EmptyTopic);
        }
        if script.trim().is_empty() {
            return Err(RecordError::EmptyScript);
        }

        Ok(Self {
            id: PodcastId::new(),
            title: derive_title(topic),
            topic: topic.to_string(),
            script,
            audio: None,
            length,
            length_label: length.label().to_string(),
            created_at: Utc::now(),
        })
    }

    pub fn id(&self) -> PodcastId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn audio(&self) -> Option<&AudioClip> {
        self.audio.as_ref()
    }

    pub fn length(&self) -> PodcastLength {
        self.length
    }

    pub fn length_label(&self) -> &str {
        &self.length_label
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// `true` once audio has been attached.
    pub fn is_finalized(&self) -> bool {
        self.audio.is_some()
    }

    /// Replace the script (edit mode).
    pub fn set_script(&mut self, script: String) -> Result<(), RecordError> {
        if self.is_finalized() {
            return Err(RecordError::Finalized);
        }
        if script.trim().is_empty() {
            return Err(RecordError::EmptyScript);
        }
        self.script = script;
        Ok(())
    }

    /// Finalise the record with the script that was synthesised and its audio.
    pub fn attach_audio(&mut self, script: String, clip: AudioClip) -> Result<(), RecordError> {
        self.set_script(script)?;
        self.audio = Some(clip);
        Ok(())
    }

    /// File stem used when downloading the audio (`the-history-of-space`).
    pub fn file_stem(&self) -> String {
        let mut stem = String::with_capacity(self.title.len());
        for c in self.title.chars() {
            if c.is_alphanumeric() {
                stem.extend(c.to_lowercase());
            } else if !stem.is_empty() && !stem.ends_with('-') {
                stem.push('-');
            }
        }
        let stem = stem.trim_end_matches('-');
        if stem.is_empty() {
            "podcast".to_string()
        } else {
            stem.to_string()
        }
    }
}

/// Capitalise the first letter and cap the length.
fn derive_title(topic: &str) -> String {
    let mut chars = topic.chars();
    let mut title = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };

    if title.chars().count() > MAX_TITLE_CHARS {
        title = title.chars().take(MAX_TITLE_CHARS - 1).collect::<String>();
        title = title.trim_end().to_string();
        title.push('…');
    }
    title
}
