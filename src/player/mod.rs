//! In-app audio player for the finished episode.
//!
//! * [`PlaybackClock`] — position, duration and play state, device-free.
//! * [`PlaybackOutput`] / [`RodioOutput`] — the audio device seam.
//! * [`Player`] — ties the two together for the UI.

pub mod clock;
pub mod output;

use std::time::Duration;

pub use clock::{format_time, PlaybackClock, SKIP_STEP};
pub use output::{PlaybackOutput, PlayerError, RodioOutput};

use crate::podcast::{AudioClip, PodcastId};

/// The player widget's model.
///
/// Holds at most one clip.  The UI calls [`tick`](Self::tick) every frame to
/// pull the position from the output.
#[derive(Default)]
pub struct Player {
    output: Option<Box<dyn PlaybackOutput>>,
    clock: PlaybackClock,
    loaded: Option<PodcastId>,
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the default device and load `clip` for episode `id`.
    pub fn load(&mut self, id: PodcastId, clip: &AudioClip) -> Result<(), PlayerError> {
        let output = RodioOutput::open(clip)?;
        self.attach(id, Box::new(output));
        Ok(())
    }

    /// Load an already opened output.
    pub fn attach(&mut self, id: PodcastId, output: Box<dyn PlaybackOutput>) {
        self.clock = PlaybackClock::new(output.duration());
        self.output = Some(output);
        self.loaded = Some(id);
    }

    /// Stop playback and release the device.
    pub fn unload(&mut self) {
        if self.loaded.take().is_some() {
            log::debug!("player: unloaded");
        }
        self.output = None;
        self.clock = PlaybackClock::default();
    }

    /// `true` when episode `id` is the one loaded.
    pub fn is_loaded(&self, id: PodcastId) -> bool {
        self.loaded == Some(id)
    }

    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    fn output(&mut self) -> Result<&mut Box<dyn PlaybackOutput>, PlayerError> {
        self.output.as_mut().ok_or(PlayerError::NothingLoaded)
    }

    /// Play or pause.  Playing from the end restarts the clip.
    /// Returns the new play state.
    pub fn toggle(&mut self) -> Result<bool, PlayerError> {
        let playing = self.clock.is_playing();
        let at_end = self.clock.at_end();
        let output = self.output()?;

        if playing {
            output.pause();
            self.clock.set_playing(false);
        } else {
            if at_end {
                output.seek(Duration::ZERO)?;
                self.clock.seek(Duration::ZERO);
            }
            self.output()?.play()?;
            self.clock.set_playing(true);
        }
        Ok(self.clock.is_playing())
    }

    /// Jump to `to`, clamped to the clip.
    pub fn seek(&mut self, to: Duration) -> Result<(), PlayerError> {
        self.output()?;
        let target = self.clock.seek(to);
        self.output()?.seek(target)
    }

    pub fn skip_forward(&mut self) -> Result<(), PlayerError> {
        self.seek(self.clock.skip_forward_target())
    }

    pub fn skip_back(&mut self) -> Result<(), PlayerError> {
        self.seek(self.clock.skip_back_target())
    }

    /// Pull position and end-of-clip from the output.
    pub fn tick(&mut self) {
        if let Some(output) = self.output.as_ref() {
            self.clock.sync(output.position(), output.is_finished());
        }
    }
}
