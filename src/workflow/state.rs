//! Workflow steps and the state the UI renders from.
//!
//! [`WorkflowStep`] is the screen currently shown.  [`WorkflowState`] is the
//! single source of truth for everything the UI needs: the step, whether a
//! request is outstanding, the current record, the user's selections and any
//! error message.
//!
//! The fields are read-only outside this module tree; every mutation goes
//! through a named transition on [`Workflow`](super::Workflow).

use std::fmt;

use crate::config::ScriptProvider;
use crate::generation::RequestId;
use crate::podcast::{PodcastLength, PodcastRecord};

// ---------------------------------------------------------------------------
// WorkflowStep
// ---------------------------------------------------------------------------

/// Screens of the podcast workflow.
///
/// ```text
/// TopicEntry ──submit──▶ LengthSelection ──script──▶ ScriptReview ──audio──▶ AudioReady
///            ◀──back───                 ◀──back───
///                        LengthSelection ───────────quick─────────────────▶ AudioReady
/// any step ──start over──▶ TopicEntry
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WorkflowStep {
    /// Waiting for the user to describe the episode.
    #[default]
    TopicEntry,

    /// Topic accepted; the user picks a length and provider.
    LengthSelection,

    /// A script exists and can be read or edited before synthesis.
    ScriptReview,

    /// Audio exists; play or download it.
    AudioReady,
}

impl WorkflowStep {
    /// Every step, in display order.
    pub const ALL: [WorkflowStep; 4] = [
        WorkflowStep::TopicEntry,
        WorkflowStep::LengthSelection,
        WorkflowStep::ScriptReview,
        WorkflowStep::AudioReady,
    ];

    /// 1-based position for the progress indicator.
    ///
    /// ```
    /// use podcast_studio::workflow::WorkflowStep;
    ///
    /// assert_eq!(WorkflowStep::TopicEntry.number(), 1);
    /// assert_eq!(WorkflowStep::AudioReady.number(), 4);
    /// ```
    pub fn number(&self) -> usize {
        match self {
            WorkflowStep::TopicEntry => 1,
            WorkflowStep::LengthSelection => 2,
            WorkflowStep::ScriptReview => 3,
            WorkflowStep::AudioReady => 4,
        }
    }

    /// A short label suitable for the progress indicator.
    pub fn label(&self) -> &'static str {
        match self {
            WorkflowStep::TopicEntry => "Topic",
            WorkflowStep::LengthSelection => "Length",
            WorkflowStep::ScriptReview => "Script",
            WorkflowStep::AudioReady => "Listen",
        }
    }
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// InFlight
// ---------------------------------------------------------------------------

/// The request currently awaiting a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum InFlight {
    Script(RequestId),
    /// Keeps the exact script sent so the record is finalised with it.
    Audio { id: RequestId, script: String },
    Podcast(RequestId),
}

impl InFlight {
    pub(crate) fn id(&self) -> RequestId {
        match self {
            InFlight::Script(id) | InFlight::Podcast(id) => *id,
            InFlight::Audio { id, .. } => *id,
        }
    }
}

// ---------------------------------------------------------------------------
// WorkflowState
// ---------------------------------------------------------------------------

/// Snapshot of the workflow, read by the UI every frame.
#[derive(Debug, Clone)]
pub struct WorkflowState {
    pub(super) step: WorkflowStep,
    pub(super) in_flight: Option<InFlight>,
    pub(super) error: Option<String>,
    pub(super) record: Option<PodcastRecord>,
    pub(super) topic: String,
    pub(super) length: PodcastLength,
    pub(super) provider: ScriptProvider,
    pub(super) editing: bool,
    pub(super) edited_script: String,
}

impl WorkflowState {
    /// Fresh state at `TopicEntry` with the given default selections.
    pub fn new(length: PodcastLength, provider: ScriptProvider) -> Self {
        Self {
            step: WorkflowStep::TopicEntry,
            in_flight: None,
            error: None,
            record: None,
            topic: String::new(),
            length,
            provider,
            editing: false,
            edited_script: String::new(),
        }
    }

    pub fn step(&self) -> WorkflowStep {
        self.step
    }

    /// `true` while a generation request is outstanding.
    ///
    /// The UI disables every control that would start a transition.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The outstanding request, if any.
    pub fn pending_request(&self) -> Option<RequestId> {
        self.in_flight.as_ref().map(InFlight::id)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn record(&self) -> Option<&PodcastRecord> {
        self.record.as_ref()
    }

    /// The accepted topic (empty before the first submit).
    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn length(&self) -> PodcastLength {
        self.length
    }

    pub fn provider(&self) -> ScriptProvider {
        self.provider
    }

    /// `true` while the script is shown as an editable field.
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// The working copy of the script in edit mode.
    pub fn edited_script(&self) -> &str {
        &self.edited_script
    }

    /// The script audio generation would use right now.
    pub fn effective_script(&self) -> Option<&str> {
        if self.editing {
            Some(self.edited_script.as_str())
        } else {
            self.record.as_ref().map(PodcastRecord::script)
        }
    }

    /// Panics if a structural invariant is broken.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        match self.step {
            WorkflowStep::TopicEntry => assert!(self.record.is_none(), "record at TopicEntry"),
            WorkflowStep::LengthSelection => {
                assert!(!self.topic.trim().is_empty(), "blank topic at LengthSelection");
                assert!(self.record.is_none(), "record at LengthSelection");
            }
            WorkflowStep::ScriptReview => {
                let record = self.record.as_ref().expect("ScriptReview without record");
                assert!(!record.script().is_empty());
                assert!(record.audio().is_none(), "audio at ScriptReview");
            }
            WorkflowStep::AudioReady => {
                let record = self.record.as_ref().expect("AudioReady without record");
                assert!(record.audio().is_some(), "AudioReady without audio");
                assert!(!self.editing, "editing at AudioReady");
            }
        }
    }
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::new(PodcastLength::default(), ScriptProvider::default())
    }
}
