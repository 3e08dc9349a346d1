//! Workflow transitions.
//!
//! [`Workflow`] owns a [`WorkflowState`] and is the only thing allowed to
//! change it.  Long-running steps are split in two so the UI thread never
//! blocks:
//!
//! 1. `begin_*` checks the step, marks a request in flight and returns the
//!    request to send to the generation worker.
//! 2. `complete_*` applies the worker's result, but only when its
//!    [`RequestId`] matches the outstanding request.  Anything else is a
//!    stale response and is dropped.
//!
//! While a request is in flight every transition is refused with
//! [`TransitionError::Busy`] and leaves the state untouched.

use thiserror::Error;

use crate::config::{AppConfig, ScriptProvider};
use crate::generation::{
    AudioRequest, GenerationClient, GenerationError, GenerationOutcome, PodcastRequest,
    RequestId, ScriptRequest,
};
use crate::podcast::{AudioClip, PodcastLength, PodcastRecord};

use super::state::{InFlight, WorkflowState, WorkflowStep};

// ---------------------------------------------------------------------------
// TransitionError
// ---------------------------------------------------------------------------

/// Why a transition was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// A generation request is outstanding.
    #[error("please wait for the current request to finish")]
    Busy,

    /// The action does not exist on the current screen.
    #[error("cannot {action} during the {step} step")]
    WrongStep {
        action: &'static str,
        step: WorkflowStep,
    },

    /// The script is not in edit mode.
    #[error("the script is not being edited")]
    NotEditing,

    /// The input was rejected before any request was made.  The message is
    /// also stored as the workflow error.
    #[error(transparent)]
    Invalid(GenerationError),
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// The podcast creation workflow.
///
/// ```
/// use podcast_studio::workflow::{Workflow, WorkflowStep};
///
/// let mut wf = Workflow::default();
/// wf.submit_topic("The history of space exploration").unwrap();
/// assert_eq!(wf.state().step(), WorkflowStep::LengthSelection);
///
/// let request = wf.begin_script_generation().unwrap();
/// assert!(wf.state().is_busy());
/// assert!(wf.back().is_err());
///
/// wf.complete_script_generation(request.id, Ok("Welcome to the show.".into()));
/// assert_eq!(wf.state().step(), WorkflowStep::ScriptReview);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Workflow {
    state: WorkflowState,
    next_request: u64,
}

impl Workflow {
    pub fn new(length: PodcastLength, provider: ScriptProvider) -> Self {
        Self {
            state: WorkflowState::new(length, provider),
            next_request: 0,
        }
    }

    /// Start from the configured default length and provider.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.ui.default_length, config.script.provider)
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    // -----------------------------------------------------------------------
    // Guards
    // -----------------------------------------------------------------------

    fn ensure_idle(&self) -> Result<(), TransitionError> {
        if self.state.is_busy() {
            log::debug!("workflow: refused, request in flight");
            return Err(TransitionError::Busy);
        }
        Ok(())
    }

    fn ensure_step(&self, action: &'static str, step: WorkflowStep) -> Result<(), TransitionError> {
        self.ensure_idle()?;
        if self.state.step != step {
            return Err(TransitionError::WrongStep {
                action,
                step: self.state.step,
            });
        }
        Ok(())
    }

    fn reject(&mut self, error: GenerationError) -> TransitionError {
        log::info!("workflow: rejected input: {error}");
        self.state.error = Some(error.to_string());
        TransitionError::Invalid(error)
    }

    fn issue_request(&mut self) -> RequestId {
        self.next_request += 1;
        RequestId::new(self.next_request)
    }

    fn clear_record(&mut self) {
        self.state.record = None;
        self.state.editing = false;
        self.state.edited_script.clear();
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Accept `topic` and move to length selection.
    ///
    /// A blank topic stores a validation error and stays on `TopicEntry`.
    /// Any record from a previous episode is discarded.
    pub fn submit_topic(&mut self, topic: &str) -> Result<(), TransitionError> {
        self.ensure_step("submit a topic", WorkflowStep::TopicEntry)?;

        let topic = topic.trim();
        if topic.is_empty() {
            return Err(self.reject(GenerationError::empty_topic()));
        }

        self.clear_record();
        self.state.topic = topic.to_string();
        self.state.error = None;
        self.state.step = WorkflowStep::LengthSelection;
        log::debug!("workflow: topic accepted, now in LengthSelection");
        Ok(())
    }

    /// Go back one step.
    ///
    /// From `ScriptReview` the unsaved script is discarded; the topic and
    /// selected length are kept.
    pub fn back(&mut self) -> Result<(), TransitionError> {
        self.ensure_idle()?;

        match self.state.step {
            WorkflowStep::LengthSelection => {
                self.state.step = WorkflowStep::TopicEntry;
            }
            WorkflowStep::ScriptReview => {
                self.clear_record();
                self.state.step = WorkflowStep::LengthSelection;
            }
            step => {
                return Err(TransitionError::WrongStep {
                    action: "go back",
                    step,
                })
            }
        }

        self.state.error = None;
        log::debug!("workflow: back, now in {:?}", self.state.step);
        Ok(())
    }

    /// Discard everything except the length and provider preferences.
    pub fn start_over(&mut self) -> Result<(), TransitionError> {
        self.ensure_idle()?;

        self.clear_record();
        self.state.topic.clear();
        self.state.error = None;
        self.state.step = WorkflowStep::TopicEntry;
        log::debug!("workflow: start over, now in TopicEntry");
        Ok(())
    }

    pub fn select_length(&mut self, length: PodcastLength) -> Result<(), TransitionError> {
        self.ensure_step("choose a length", WorkflowStep::LengthSelection)?;
        self.state.length = length;
        Ok(())
    }

    pub fn select_provider(&mut self, provider: ScriptProvider) -> Result<(), TransitionError> {
        self.ensure_step("choose a provider", WorkflowStep::LengthSelection)?;
        self.state.provider = provider;
        Ok(())
    }

    /// Clear the displayed error.  Allowed at any time.
    pub fn dismiss_error(&mut self) {
        self.state.error = None;
    }

    /// Stop waiting for the outstanding request.
    ///
    /// The network call is not cancelled; its response will arrive as a
    /// stale result and be ignored.  Returns `false` when nothing was
    /// pending.
    pub fn abandon_request(&mut self) -> bool {
        match self.state.in_flight.take() {
            Some(pending) => {
                log::info!("workflow: abandoned request {}", pending.id());
                true
            }
            None => false,
        }
    }

    // -----------------------------------------------------------------------
    // Script review
    // -----------------------------------------------------------------------

    /// Switch between reading and editing the script.
    ///
    /// The working copy survives toggling off and on again.
    pub fn toggle_edit(&mut self) -> Result<(), TransitionError> {
        self.ensure_step("edit the script", WorkflowStep::ScriptReview)?;
        self.state.editing = !self.state.editing;
        Ok(())
    }

    /// Replace the working copy of the script.
    pub fn edit_script(&mut self, text: impl Into<String>) -> Result<(), TransitionError> {
        self.ensure_step("edit the script", WorkflowStep::ScriptReview)?;
        if !self.state.editing {
            return Err(TransitionError::NotEditing);
        }
        self.state.edited_script = text.into();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Script generation
    // -----------------------------------------------------------------------

    /// Mark a script request in flight and return it.
    pub fn begin_script_generation(&mut self) -> Result<ScriptRequest, TransitionError> {
        self.ensure_step("generate a script", WorkflowStep::LengthSelection)?;

        let id = self.issue_request();
        self.state.in_flight = Some(InFlight::Script(id));
        self.state.error = None;
        log::debug!("workflow: script request {id} in flight");

        Ok(ScriptRequest {
            id,
            topic: self.state.topic.clone(),
            length: self.state.length,
            provider: self.state.provider,
        })
    }

    /// Apply a script result.  Returns `false` for a stale response.
    ///
    /// On success the workflow moves to `ScriptReview`; on failure it stays
    /// on `LengthSelection` with the error stored.
    pub fn complete_script_generation(
        &mut self,
        id: RequestId,
        result: Result<String, GenerationError>,
    ) -> bool {
        if !matches!(self.state.in_flight, Some(InFlight::Script(pending)) if pending == id) {
            log::warn!("workflow: ignoring stale script response {id}");
            return false;
        }
        self.state.in_flight = None;

        let record = result.and_then(|script| {
            PodcastRecord::new(&self.state.topic, self.state.length, script)
                .map_err(|e| GenerationError::Service(format!("Failed to generate script: {e}")))
        });

        match record {
            Ok(record) => {
                self.state.edited_script = record.script().to_string();
                self.state.editing = false;
                self.state.record = Some(record);
                self.state.step = WorkflowStep::ScriptReview;
                log::debug!("workflow: script ready, now in ScriptReview");
            }
            Err(e) => {
                log::warn!("workflow: script generation failed: {e}");
                self.state.error = Some(e.to_string());
            }
        }
        true
    }

    // -----------------------------------------------------------------------
    // Audio generation
    // -----------------------------------------------------------------------

    /// Mark an audio request in flight and return it.
    ///
    /// Uses the edited script in edit mode and the generated one otherwise.
    /// A blank script stores a validation error and sends nothing.
    pub fn begin_audio_generation(&mut self) -> Result<AudioRequest, TransitionError> {
        self.ensure_step("generate audio", WorkflowStep::ScriptReview)?;

        let script = self.state.effective_script().unwrap_or_default().to_string();
        if script.trim().is_empty() {
            return Err(self.reject(GenerationError::empty_script()));
        }

        let id = self.issue_request();
        self.state.in_flight = Some(InFlight::Audio {
            id,
            script: script.clone(),
        });
        self.state.error = None;
        log::debug!("workflow: audio request {id} in flight");

        Ok(AudioRequest { id, script })
    }

    /// Apply an audio result.  Returns `false` for a stale response.
    ///
    /// On success the record is finalised with the synthesised script and
    /// the workflow moves to `AudioReady`.  On failure it stays on
    /// `ScriptReview` with no audio and the error stored.
    pub fn complete_audio_generation(
        &mut self,
        id: RequestId,
        result: Result<AudioClip, GenerationError>,
    ) -> bool {
        let script = match self.state.in_flight.take() {
            Some(InFlight::Audio { id: pending, script }) if pending == id => script,
            other => {
                self.state.in_flight = other;
                log::warn!("workflow: ignoring stale audio response {id}");
                return false;
            }
        };

        let finalised = result.and_then(|clip| match self.state.record.as_mut() {
            Some(record) => record
                .attach_audio(script, clip)
                .map_err(|e| GenerationError::Service(format!("Failed to generate audio: {e}"))),
            None => Err(GenerationError::Service(
                "Failed to generate audio: no script to attach it to".into(),
            )),
        });

        match finalised {
            Ok(()) => {
                self.state.editing = false;
                self.state.step = WorkflowStep::AudioReady;
                log::debug!("workflow: audio ready, now in AudioReady");
            }
            Err(e) => {
                log::warn!("workflow: audio generation failed: {e}");
                self.state.error = Some(e.to_string());
            }
        }
        true
    }

    // -----------------------------------------------------------------------
    // Quick generation
    // -----------------------------------------------------------------------

    /// Mark a combined script-and-audio request in flight and return it.
    pub fn begin_quick_generation(&mut self) -> Result<PodcastRequest, TransitionError> {
        self.ensure_step("generate a podcast", WorkflowStep::LengthSelection)?;

        let id = self.issue_request();
        self.state.in_flight = Some(InFlight::Podcast(id));
        self.state.error = None;
        log::debug!("workflow: podcast request {id} in flight");

        Ok(PodcastRequest {
            id,
            topic: self.state.topic.clone(),
            length: self.state.length,
            provider: self.state.provider,
        })
    }

    /// Apply a combined result.  Returns `false` for a stale response.
    pub fn complete_quick_generation(
        &mut self,
        id: RequestId,
        result: Result<PodcastRecord, GenerationError>,
    ) -> bool {
        if !matches!(self.state.in_flight, Some(InFlight::Podcast(pending)) if pending == id) {
            log::warn!("workflow: ignoring stale podcast response {id}");
            return false;
        }
        self.state.in_flight = None;

        match result {
            Ok(record) if record.is_finalized() => {
                self.state.edited_script = record.script().to_string();
                self.state.editing = false;
                self.state.record = Some(record);
                self.state.step = WorkflowStep::AudioReady;
                log::debug!("workflow: podcast ready, now in AudioReady");
            }
            Ok(_) => {
                self.state.error = Some("Failed to generate audio. Please try again.".into());
            }
            Err(e) => {
                log::warn!("workflow: podcast generation failed: {e}");
                self.state.error = Some(e.to_string());
            }
        }
        true
    }

    /// Route a worker outcome to the matching `complete_*`.
    pub fn apply(&mut self, outcome: GenerationOutcome) -> bool {
        match outcome {
            GenerationOutcome::Script { id, result } => self.complete_script_generation(id, result),
            GenerationOutcome::Audio { id, result } => self.complete_audio_generation(id, result),
            GenerationOutcome::Podcast { id, result } => self.complete_quick_generation(id, result),
        }
    }

    // -----------------------------------------------------------------------
    // Direct async drivers
    // -----------------------------------------------------------------------

    /// Begin, await and complete a script request against `client`.
    pub async fn generate_script(
        &mut self,
        client: &GenerationClient,
    ) -> Result<(), TransitionError> {
        let r = self.begin_script_generation()?;
        let result = client.generate_script(&r.topic, r.length, r.provider).await;
        self.complete_script_generation(r.id, result);
        Ok(())
    }

    /// Begin, await and complete an audio request against `client`.
    pub async fn generate_audio(&mut self, client: &GenerationClient) -> Result<(), TransitionError> {
        let r = self.begin_audio_generation()?;
        let result = client.synthesize_audio(&r.script).await;
        self.complete_audio_generation(r.id, result);
        Ok(())
    }

    /// Begin, await and complete a quick request against `client`.
    pub async fn generate_podcast(
        &mut self,
        client: &GenerationClient,
    ) -> Result<(), TransitionError> {
        let r = self.begin_quick_generation()?;
        let result = client.generate_podcast(&r.topic, r.length, r.provider).await;
        self.complete_quick_generation(r.id, result);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::generation::testing::{FailingGenerator, FixedGenerator, FixedSynthesizer};
    use crate::llm::LlmError;
    use crate::podcast::AudioEncoding;
    use crate::tts::TtsError;

    const TOPIC: &str = "The history of space exploration";

    fn clip() -> AudioClip {
        AudioClip::new(b"ABC".to_vec(), AudioEncoding::Mp3)
    }

    fn at_length_selection() -> Workflow {
        let mut wf = Workflow::default();
        wf.submit_topic(TOPIC).unwrap();
        wf
    }

    fn at_script_review(script: &str) -> Workflow {
        let mut wf = at_length_selection();
        let r = wf.begin_script_generation().unwrap();
        assert!(wf.complete_script_generation(r.id, Ok(script.into())));
        wf
    }

    fn service_error() -> GenerationError {
        GenerationError::Service("Failed to generate script. Please try again.".into())
    }

    // ── Topic entry ─────────────────────────────────────────────────────────

    #[test]
    fn blank_topic_stays_on_topic_entry() {
        let mut wf = Workflow::default();
        let err = wf.submit_topic("   ").unwrap_err();

        assert!(matches!(err, TransitionError::Invalid(GenerationError::Validation(_))));
        assert_eq!(wf.state().step(), WorkflowStep::TopicEntry);
        assert_eq!(wf.state().error(), Some("Please enter a topic for your podcast"));
        wf.state().assert_invariants();
    }

    #[test]
    fn submit_topic_trims_and_advances() {
        let mut wf = Workflow::default();
        wf.submit_topic("  Tea  ").unwrap();

        assert_eq!(wf.state().step(), WorkflowStep::LengthSelection);
        assert_eq!(wf.state().topic(), "Tea");
        assert!(wf.state().error().is_none());
        wf.state().assert_invariants();
    }

    #[test]
    fn valid_topic_clears_previous_error() {
        let mut wf = Workflow::default();
        let _ = wf.submit_topic("");
        wf.submit_topic("Tea").unwrap();
        assert!(wf.state().error().is_none());
    }

    #[test]
    fn from_config_uses_default_length() {
        let mut config = AppConfig::default();
        config.ui.default_length = PodcastLength::FiveMinutes;
        config.script.provider = ScriptProvider::OpenAi;

        let wf = Workflow::from_config(&config);
        assert_eq!(wf.state().length(), PodcastLength::FiveMinutes);
        assert_eq!(wf.state().provider(), ScriptProvider::OpenAi);
    }

    // ── Navigation ──────────────────────────────────────────────────────────

    #[test]
    fn back_from_length_keeps_topic() {
        let mut wf = at_length_selection();
        wf.back().unwrap();

        assert_eq!(wf.state().step(), WorkflowStep::TopicEntry);
        assert_eq!(wf.state().topic(), TOPIC);
    }

    #[test]
    fn back_from_review_discards_script_keeps_selection() {
        let mut wf = at_length_selection();
        wf.select_length(PodcastLength::ThreeMinutes).unwrap();
        let r = wf.begin_script_generation().unwrap();
        wf.complete_script_generation(r.id, Ok("S".into()));

        wf.back().unwrap();

        let s = wf.state();
        assert_eq!(s.step(), WorkflowStep::LengthSelection);
        assert!(s.record().is_none());
        assert_eq!(s.topic(), TOPIC);
        assert_eq!(s.length(), PodcastLength::ThreeMinutes);
        s.assert_invariants();
    }

    #[test]
    fn back_is_not_available_everywhere() {
        let mut wf = Workflow::default();
        assert!(matches!(
            wf.back(),
            Err(TransitionError::WrongStep {
                step: WorkflowStep::TopicEntry,
                ..
            })
        ));
    }

    #[test]
    fn selections_only_on_length_step() {
        let mut wf = Workflow::default();
        assert!(wf.select_length(PodcastLength::FiveMinutes).is_err());
        assert!(wf.select_provider(ScriptProvider::OpenAi).is_err());

        let mut wf = at_length_selection();
        wf.select_length(PodcastLength::FiveMinutes).unwrap();
        wf.select_provider(ScriptProvider::OpenAi).unwrap();
        assert_eq!(wf.state().length(), PodcastLength::FiveMinutes);
        assert_eq!(wf.state().provider(), ScriptProvider::OpenAi);
    }

    #[test]
    fn start_over_discards_record_keeps_preferences() {
        let mut wf = at_length_selection();
        wf.select_length(PodcastLength::TwoMinutes).unwrap();
        let r = wf.begin_quick_generation().unwrap();
        let record = {
            let mut rec = PodcastRecord::new(TOPIC, PodcastLength::TwoMinutes, "S".into()).unwrap();
            rec.attach_audio("S".into(), clip()).unwrap();
            rec
        };
        wf.complete_quick_generation(r.id, Ok(record));

        wf.start_over().unwrap();

        let s = wf.state();
        assert_eq!(s.step(), WorkflowStep::TopicEntry);
        assert!(s.record().is_none());
        assert!(s.topic().is_empty());
        assert_eq!(s.length(), PodcastLength::TwoMinutes);
        s.assert_invariants();
    }

    // ── In-flight guard ─────────────────────────────────────────────────────

    #[test]
    fn every_transition_is_refused_while_busy() {
        let mut wf = at_length_selection();
        let r = wf.begin_script_generation().unwrap();
        let before = format!("{:?}", wf.state());

        assert_eq!(wf.begin_script_generation().unwrap_err(), TransitionError::Busy);
        assert_eq!(wf.begin_quick_generation().unwrap_err(), TransitionError::Busy);
        assert_eq!(wf.back().unwrap_err(), TransitionError::Busy);
        assert_eq!(wf.start_over().unwrap_err(), TransitionError::Busy);
        assert_eq!(
            wf.select_length(PodcastLength::FiveMinutes).unwrap_err(),
            TransitionError::Busy
        );
        assert_eq!(
            wf.select_provider(ScriptProvider::OpenAi).unwrap_err(),
            TransitionError::Busy
        );
        assert_eq!(format!("{:?}", wf.state()), before);

        assert!(wf.complete_script_generation(r.id, Ok("S".into())));
        assert!(!wf.state().is_busy());
    }

    #[test]
    fn review_transitions_refused_while_audio_in_flight() {
        let mut wf = at_script_review("S");
        wf.begin_audio_generation().unwrap();

        assert_eq!(wf.toggle_edit().unwrap_err(), TransitionError::Busy);
        assert_eq!(wf.edit_script("x").unwrap_err(), TransitionError::Busy);
        assert_eq!(wf.begin_audio_generation().unwrap_err(), TransitionError::Busy);
        assert!(!wf.state().is_editing());
    }

    // ── Script generation ───────────────────────────────────────────────────

    #[test]
    fn script_request_carries_selection() {
        let mut wf = at_length_selection();
        wf.select_length(PodcastLength::TwoMinutes).unwrap();
        wf.select_provider(ScriptProvider::OpenAi).unwrap();

        let r = wf.begin_script_generation().unwrap();
        assert_eq!(r.topic, TOPIC);
        assert_eq!(r.length, PodcastLength::TwoMinutes);
        assert_eq!(r.provider, ScriptProvider::OpenAi);
        assert_eq!(wf.state().pending_request(), Some(r.id));
    }

    #[test]
    fn script_success_enters_review() {
        let wf = at_script_review("Welcome to the show.");
        let s = wf.state();

        assert_eq!(s.step(), WorkflowStep::ScriptReview);
        assert!(!s.is_busy());
        let record = s.record().unwrap();
        assert_eq!(record.script(), "Welcome to the show.");
        assert_eq!(record.topic(), TOPIC);
        assert_eq!(record.length_label(), "1 minute");
        assert!(record.audio().is_none());
        assert_eq!(s.edited_script(), "Welcome to the show.");
        s.assert_invariants();
    }

    #[test]
    fn script_failure_stays_on_length_selection() {
        let mut wf = at_length_selection();
        let r = wf.begin_script_generation().unwrap();
        assert!(wf.complete_script_generation(r.id, Err(service_error())));

        let s = wf.state();
        assert_eq!(s.step(), WorkflowStep::LengthSelection);
        assert!(!s.is_busy());
        assert!(s.record().is_none());
        assert_eq!(s.error(), Some("Failed to generate script. Please try again."));
        s.assert_invariants();
    }

    #[test]
    fn blank_script_result_is_an_error() {
        let mut wf = at_length_selection();
        let r = wf.begin_script_generation().unwrap();
        wf.complete_script_generation(r.id, Ok("   ".into()));

        assert_eq!(wf.state().step(), WorkflowStep::LengthSelection);
        assert!(wf.state().error().is_some());
    }

    #[test]
    fn stale_script_response_is_ignored() {
        let mut wf = at_length_selection();
        let first = wf.begin_script_generation().unwrap();
        assert!(wf.abandon_request());

        let second = wf.begin_script_generation().unwrap();
        assert!(!wf.complete_script_generation(first.id, Ok("old".into())));
        assert!(wf.state().is_busy());

        assert!(wf.complete_script_generation(second.id, Ok("new".into())));
        assert_eq!(wf.state().record().unwrap().script(), "new");
    }

    #[test]
    fn response_after_abandon_and_start_over_is_ignored() {
        let mut wf = at_length_selection();
        let r = wf.begin_script_generation().unwrap();
        wf.abandon_request();
        wf.start_over().unwrap();

        assert!(!wf.complete_script_generation(r.id, Ok("late".into())));
        assert_eq!(wf.state().step(), WorkflowStep::TopicEntry);
        assert!(wf.state().record().is_none());
    }

    #[test]
    fn mismatched_response_kind_is_ignored() {
        let mut wf = at_length_selection();
        let r = wf.begin_script_generation().unwrap();
        assert!(!wf.complete_audio_generation(r.id, Ok(clip())));
        assert!(wf.state().is_busy());
    }

    #[test]
    fn abandon_without_request_is_noop() {
        let mut wf = Workflow::default();
        assert!(!wf.abandon_request());
    }

    // ── Review and editing ──────────────────────────────────────────────────

    #[test]
    fn edit_requires_edit_mode() {
        let mut wf = at_script_review("S");
        assert_eq!(wf.edit_script("x").unwrap_err(), TransitionError::NotEditing);
    }

    #[test]
    fn edits_survive_toggling() {
        let mut wf = at_script_review("Original");
        wf.toggle_edit().unwrap();
        wf.edit_script("Edited").unwrap();
        wf.toggle_edit().unwrap();
        wf.toggle_edit().unwrap();

        assert_eq!(wf.state().edited_script(), "Edited");
        assert_eq!(wf.state().record().unwrap().script(), "Original");
    }

    #[test]
    fn audio_uses_edited_script_in_edit_mode() {
        let mut wf = at_script_review("Original");
        wf.toggle_edit().unwrap();
        wf.edit_script("Edited").unwrap();

        let r = wf.begin_audio_generation().unwrap();
        assert_eq!(r.script, "Edited");

        assert!(wf.complete_audio_generation(r.id, Ok(clip())));
        let s = wf.state();
        assert_eq!(s.step(), WorkflowStep::AudioReady);
        assert_eq!(s.record().unwrap().script(), "Edited");
        assert!(!s.is_editing());
        s.assert_invariants();
    }

    #[test]
    fn audio_uses_generated_script_outside_edit_mode() {
        let mut wf = at_script_review("Original");
        wf.toggle_edit().unwrap();
        wf.edit_script("Edited").unwrap();
        wf.toggle_edit().unwrap();

        let r = wf.begin_audio_generation().unwrap();
        assert_eq!(r.script, "Original");
    }

    #[test]
    fn blank_edited_script_is_rejected_without_request() {
        let mut wf = at_script_review("Original");
        wf.toggle_edit().unwrap();
        wf.edit_script("  ").unwrap();

        let err = wf.begin_audio_generation().unwrap_err();
        assert!(matches!(err, TransitionError::Invalid(GenerationError::Validation(_))));
        assert!(!wf.state().is_busy());
        assert_eq!(wf.state().step(), WorkflowStep::ScriptReview);
        assert!(wf.state().error().is_some());
    }

    #[test]
    fn audio_failure_stays_on_review_without_audio() {
        let mut wf = at_script_review("S");
        let r = wf.begin_audio_generation().unwrap();
        wf.complete_audio_generation(
            r.id,
            Err(GenerationError::Service("Failed to generate audio. Please try again.".into())),
        );

        let s = wf.state();
        assert_eq!(s.step(), WorkflowStep::ScriptReview);
        assert!(s.record().unwrap().audio().is_none());
        assert_eq!(s.error(), Some("Failed to generate audio. Please try again."));
        s.assert_invariants();
    }

    #[test]
    fn stale_audio_response_is_ignored() {
        let mut wf = at_script_review("S");
        let first = wf.begin_audio_generation().unwrap();
        wf.abandon_request();
        wf.back().unwrap();

        assert!(!wf.complete_audio_generation(first.id, Ok(clip())));
        assert_eq!(wf.state().step(), WorkflowStep::LengthSelection);
        assert!(wf.state().record().is_none());
    }

    #[test]
    fn dismiss_error_clears_message_only() {
        let mut wf = Workflow::default();
        let _ = wf.submit_topic("");
        wf.dismiss_error();
        assert!(wf.state().error().is_none());
        assert_eq!(wf.state().step(), WorkflowStep::TopicEntry);
    }

    // ── Quick generation ────────────────────────────────────────────────────

    #[test]
    fn quick_generation_without_audio_is_an_error() {
        let mut wf = at_length_selection();
        let r = wf.begin_quick_generation().unwrap();
        let record = PodcastRecord::new(TOPIC, PodcastLength::OneMinute, "S".into()).unwrap();
        wf.complete_quick_generation(r.id, Ok(record));

        assert_eq!(wf.state().step(), WorkflowStep::LengthSelection);
        assert!(wf.state().error().is_some());
        wf.state().assert_invariants();
    }

    #[test]
    fn apply_routes_outcomes() {
        let mut wf = at_length_selection();
        let r = wf.begin_script_generation().unwrap();
        assert!(wf.apply(GenerationOutcome::Script {
            id: r.id,
            result: Ok("S".into()),
        }));
        assert_eq!(wf.state().step(), WorkflowStep::ScriptReview);
    }

    // ── Against the generation client ───────────────────────────────────────

    fn client(
        generator: Arc<dyn crate::llm::ScriptGenerator>,
        synth: Arc<FixedSynthesizer>,
    ) -> GenerationClient {
        GenerationClient::new(synth).with_generator(ScriptProvider::Gemini, generator)
    }

    #[tokio::test]
    async fn end_to_end_two_minute_episode() {
        let generator = Arc::new(FixedGenerator::new("Welcome to a journey beyond the sky."));
        let synth = Arc::new(FixedSynthesizer::base64("QUJD"));
        let client = client(generator.clone(), synth.clone());

        let mut wf = Workflow::default();
        wf.submit_topic(TOPIC).unwrap();
        wf.select_length(PodcastLength::TwoMinutes).unwrap();

        wf.generate_script(&client).await.unwrap();
        assert_eq!(wf.state().step(), WorkflowStep::ScriptReview);
        assert!(generator.prompts()[0].contains("300"));
        assert!(generator.prompts()[0].contains(TOPIC));
        assert_eq!(
            wf.state().record().unwrap().script(),
            "Welcome to a journey beyond the sky."
        );

        wf.generate_audio(&client).await.unwrap();
        let s = wf.state();
        assert_eq!(s.step(), WorkflowStep::AudioReady);
        assert_eq!(s.record().unwrap().audio().unwrap().bytes(), b"ABC");
        assert_eq!(synth.calls(), vec!["Welcome to a journey beyond the sky.".to_string()]);
        s.assert_invariants();
    }

    #[tokio::test]
    async fn quick_generation_reaches_audio_ready() {
        let synth = Arc::new(FixedSynthesizer::base64("QUJD"));
        let client = client(Arc::new(FixedGenerator::new("S")), synth);

        let mut wf = at_length_selection();
        wf.generate_podcast(&client).await.unwrap();

        let s = wf.state();
        assert_eq!(s.step(), WorkflowStep::AudioReady);
        assert_eq!(s.record().unwrap().script(), "S");
        s.assert_invariants();
    }

    #[tokio::test]
    async fn failed_script_never_synthesises() {
        let synth = Arc::new(FixedSynthesizer::base64("QUJD"));
        let client = client(
            Arc::new(FailingGenerator::new(|| LlmError::EmptyResponse)),
            synth.clone(),
        );

        let mut wf = at_length_selection();
        wf.generate_podcast(&client).await.unwrap();

        assert_eq!(wf.state().step(), WorkflowStep::LengthSelection);
        assert!(wf.state().error().unwrap().starts_with("Failed to generate script"));
        assert!(synth.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_tts_key_surfaces_configuration_message() {
        let synth = Arc::new(FixedSynthesizer::failing(|| TtsError::MissingApiKey {
            env_var: "GEMINI_TTS_API_KEY",
        }));
        let client = client(Arc::new(FixedGenerator::new("S")), synth);

        let mut wf = at_length_selection();
        wf.generate_script(&client).await.unwrap();
        wf.generate_audio(&client).await.unwrap();

        assert_eq!(wf.state().step(), WorkflowStep::ScriptReview);
        assert!(wf.state().error().unwrap().contains("GEMINI_TTS_API_KEY"));
    }

    #[tokio::test]
    async fn driver_refuses_wrong_step() {
        let client = client(
            Arc::new(FixedGenerator::new("S")),
            Arc::new(FixedSynthesizer::base64("QUJD")),
        );
        let mut wf = Workflow::default();
        assert!(matches!(
            wf.generate_audio(&client).await,
            Err(TransitionError::WrongStep { .. })
        ));
    }
}
