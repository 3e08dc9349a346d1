//! Playback position bookkeeping, independent of any audio device.

use std::time::Duration;

/// Distance covered by the skip buttons.
pub const SKIP_STEP: Duration = Duration::from_secs(10);

/// Format `d` as `m:ss`.
///
/// ```
/// use std::time::Duration;
/// use podcast_studio::player::format_time;
///
/// assert_eq!(format_time(Duration::from_secs(65)), "1:05");
/// assert_eq!(format_time(Duration::ZERO), "0:00");
/// ```
pub fn format_time(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Play state and position of the loaded clip.
///
/// `duration` is `None` when the decoder cannot tell the length up front;
/// seeking is then only bounded below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackClock {
    position: Duration,
    duration: Option<Duration>,
    playing: bool,
}

impl PlaybackClock {
    /// A paused clock at `0:00`.
    pub fn new(duration: Option<Duration>) -> Self {
        Self {
            position: Duration::ZERO,
            duration,
            playing: false,
        }
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    /// `true` once the position has reached a known end.
    pub fn at_end(&self) -> bool {
        matches!(self.duration, Some(d) if self.position >= d)
    }

    /// Fraction played, `0.0..=1.0`.  `0.0` when the length is unknown.
    pub fn progress(&self) -> f32 {
        match self.duration {
            Some(d) if !d.is_zero() => {
                (self.position.as_secs_f32() / d.as_secs_f32()).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    fn clamp(&self, to: Duration) -> Duration {
        match self.duration {
            Some(d) => to.min(d),
            None => to,
        }
    }

    /// Move to `to`, clamped to the clip.  Returns the new position.
    pub fn seek(&mut self, to: Duration) -> Duration {
        self.position = self.clamp(to);
        self.position
    }

    /// Target of the skip-forward button.
    pub fn skip_forward_target(&self) -> Duration {
        self.clamp(self.position.saturating_add(SKIP_STEP))
    }

    /// Target of the skip-back button.
    pub fn skip_back_target(&self) -> Duration {
        self.position.saturating_sub(SKIP_STEP)
    }

    /// Take the position reported by the output.
    ///
    /// When the output has run dry the clock stops at the end.
    pub fn sync(&mut self, position: Duration, finished: bool) {
        self.position = self.clamp(position);
        if finished && self.playing {
            self.playing = false;
            if let Some(d) = self.duration {
                self.position = d;
            }
        }
    }
}
