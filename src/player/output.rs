//! Audio output: the [`PlaybackOutput`] seam and its rodio implementation.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};
use thiserror::Error;

use crate::podcast::AudioClip;

/// Errors raised by the audio output.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("no audio output device available: {0}")]
    Device(#[from] rodio::StreamError),

    #[error("could not open audio sink: {0}")]
    Sink(#[from] rodio::PlayError),

    #[error("audio could not be decoded: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),

    #[error("seek failed: {0}")]
    Seek(#[from] rodio::source::SeekError),

    #[error("nothing is loaded")]
    NothingLoaded,
}

/// Something that can play one clip.
///
/// Implemented by [`RodioOutput`] for real devices and by test doubles.
pub trait PlaybackOutput {
    /// Total length, when the decoder knows it.
    fn duration(&self) -> Option<Duration>;
    fn play(&mut self) -> Result<(), PlayerError>;
    fn pause(&mut self);
    fn seek(&mut self, to: Duration) -> Result<(), PlayerError>;
    /// Current position from the start of the clip.
    fn position(&self) -> Duration;
    /// `true` once the whole clip has been played.
    fn is_finished(&self) -> bool;
}

type ClipSource = Decoder<Cursor<Arc<[u8]>>>;

/// Plays a clip from memory on the default output device.
///
/// The stream must outlive the sink, so both are kept here.  Neither is
/// `Send`; the output lives on the UI thread.
pub struct RodioOutput {
    _stream: OutputStream,
    sink: Sink,
    bytes: Arc<[u8]>,
    duration: Option<Duration>,
}

impl RodioOutput {
    /// Open the default device and queue `clip`, paused.
    pub fn open(clip: &AudioClip) -> Result<Self, PlayerError> {
        let (stream, handle) = OutputStream::try_default()?;
        let sink = Sink::try_new(&handle)?;
        sink.pause();

        let bytes = clip.shared_bytes();
        let source = decode(&bytes)?;
        let duration = source.total_duration();
        sink.append(source);

        log::info!(
            "player: loaded {} bytes ({})",
            bytes.len(),
            clip.encoding().mime_type()
        );

        Ok(Self {
            _stream: stream,
            sink,
            bytes,
            duration,
        })
    }

    /// Re-queue the clip after it has played out.
    fn requeue_if_empty(&mut self) -> Result<(), PlayerError> {
        if self.sink.empty() {
            self.sink.append(decode(&self.bytes)?);
        }
        Ok(())
    }
}

fn decode(bytes: &Arc<[u8]>) -> Result<ClipSource, PlayerError> {
    Ok(Decoder::new(Cursor::new(Arc::clone(bytes)))?)
}

impl PlaybackOutput for RodioOutput {
    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn play(&mut self) -> Result<(), PlayerError> {
        self.requeue_if_empty()?;
        self.sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn seek(&mut self, to: Duration) -> Result<(), PlayerError> {
        self.requeue_if_empty()?;
        self.sink.try_seek(to)?;
        Ok(())
    }

    fn position(&self) -> Duration {
        self.sink.get_pos()
    }

    fn is_finished(&self) -> bool {
        self.sink.empty()
    }
}

impl Drop for RodioOutput {
    fn drop(&mut self) {
        self.sink.stop();
    }
}
