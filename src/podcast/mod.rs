//! Domain types: episode length, the podcast record and its audio clip.

pub mod audio;
pub mod length;
pub mod record;

pub use audio::{AudioClip, AudioEncoding};
pub use length::{PodcastLength, UnknownLength};
pub use record::{PodcastId, PodcastRecord, RecordError};
