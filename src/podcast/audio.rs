//! Synthesised audio held in memory for the session.
//!
//! An [`AudioClip`] is the playable handle the rest of the application passes
//! around.  Cloning it is an `Arc` bump; the bytes are only written to disk
//! when the user explicitly downloads the episode.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Encodings the speech-synthesis provider can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudioEncoding {
    Mp3,
    Linear16,
    OggOpus,
}

impl AudioEncoding {
    /// File extension for downloads.
    pub fn extension(&self) -> &'static str {
        match self {
            AudioEncoding::Mp3 => "mp3",
            AudioEncoding::Linear16 => "wav",
            AudioEncoding::OggOpus => "ogg",
        }
    }

    /// MIME type of the encoded bytes.
    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioEncoding::Mp3 => "audio/mpeg",
            AudioEncoding::Linear16 => "audio/wav",
            AudioEncoding::OggOpus => "audio/ogg",
        }
    }
}

impl Default for AudioEncoding {
    fn default() -> Self {
        AudioEncoding::Mp3
    }
}

/// Encoded audio bytes plus their encoding.
#[derive(Clone, PartialEq, Eq)]
pub struct AudioClip {
    bytes: Arc<[u8]>,
    encoding: AudioEncoding,
}

impl AudioClip {
    pub fn new(bytes: impl Into<Arc<[u8]>>, encoding: AudioEncoding) -> Self {
        Self {
            bytes: bytes.into(),
            encoding,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// A cheap shared handle to the bytes, for handing to the audio output.
    pub fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    pub fn encoding(&self) -> AudioEncoding {
        self.encoding
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write the clip to `dir/<stem>.<ext>`, creating `dir` if needed.
    ///
    /// An existing file of the same name gets a numeric suffix instead of
    /// being overwritten.
    pub fn save_to(&self, dir: &Path, stem: &str) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;

        let ext = self.encoding.extension();
        let mut path = dir.join(format!("{stem}.{ext}"));
        let mut n = 1;
        while path.exists() {
            path = dir.join(format!("{stem}-{n}.{ext}"));
            n += 1;
        }

        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

impl fmt::Debug for AudioClip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioClip")
            .field("len", &self.bytes.len())
            .field("encoding", &self.encoding)
            .finish()
    }
}
