//! Target spoken length of an episode.
//!
//! Each variant maps to a fixed word budget, assuming roughly 150 spoken
//! words per minute.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The closed set of episode lengths offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PodcastLength {
    #[serde(rename = "30sec")]
    ThirtySeconds,
    #[serde(rename = "1min")]
    OneMinute,
    #[serde(rename = "2min")]
    TwoMinutes,
    #[serde(rename = "3min")]
    ThreeMinutes,
    #[serde(rename = "5min")]
    FiveMinutes,
}

/// Returned by [`PodcastLength::from_str`] for an unknown id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown podcast length: {0:?}")]
pub struct UnknownLength(pub String);

impl PodcastLength {
    /// Every length, shortest first.
    pub const ALL: [PodcastLength; 5] = [
        PodcastLength::ThirtySeconds,
        PodcastLength::OneMinute,
        PodcastLength::TwoMinutes,
        PodcastLength::ThreeMinutes,
        PodcastLength::FiveMinutes,
    ];

    /// Short identifier used in prompts and settings (`"2min"`).
    pub fn id(&self) -> &'static str {
        match self {
            PodcastLength::ThirtySeconds => "30sec",
            PodcastLength::OneMinute => "1min",
            PodcastLength::TwoMinutes => "2min",
            PodcastLength::ThreeMinutes => "3min",
            PodcastLength::FiveMinutes => "5min",
        }
    }

    /// Approximate number of words the script should contain.
    pub fn word_count(&self) -> u32 {
        match self {
            PodcastLength::ThirtySeconds => 75,
            PodcastLength::OneMinute => 150,
            PodcastLength::TwoMinutes => 300,
            PodcastLength::ThreeMinutes => 450,
            PodcastLength::FiveMinutes => 750,
        }
    }

    /// Human-readable length (`"2 minutes"`), stored on the record.
    pub fn label(&self) -> &'static str {
        match self {
            PodcastLength::ThirtySeconds => "30 seconds",
            PodcastLength::OneMinute => "1 minute",
            PodcastLength::TwoMinutes => "2 minutes",
            PodcastLength::ThreeMinutes => "3 minutes",
            PodcastLength::FiveMinutes => "5 minutes",
        }
    }

    /// One-line hint shown under the label on the length picker.
    pub fn description(&self) -> &'static str {
        match self {
            PodcastLength::ThirtySeconds => "Quick soundbite",
            PodcastLength::OneMinute => "Brief overview",
            PodcastLength::TwoMinutes => "Short episode",
            PodcastLength::ThreeMinutes => "Detailed coverage",
            PodcastLength::FiveMinutes => "In-depth episode",
        }
    }
}

impl Default for PodcastLength {
    fn default() -> Self {
        PodcastLength::OneMinute
    }
}

impl fmt::Display for PodcastLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for PodcastLength {
    type Err = UnknownLength;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PodcastLength::ALL
            .into_iter()
            .find(|len| len.id() == s)
            .ok_or_else(|| UnknownLength(s.to_string()))
    }
}
