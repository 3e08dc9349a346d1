//! Podcast Studio window — egui/eframe application.
//!
//! # Architecture
//!
//! [`PodcastStudioApp`] is the top-level [`eframe::App`].  It owns the
//! [`Workflow`], the [`Player`] and two channel endpoints:
//!
//! * `command_tx` — sends [`GenerationCommand`]s to the generation worker.
//! * `result_rx`  — receives [`GenerationOutcome`]s, polled every frame.
//!
//! Panels never mutate the workflow directly.  They return [`Action`]s,
//! which [`PodcastStudioApp::perform`] maps onto workflow transitions after
//! the frame is drawn.
//!
//! # Panels
//!
//! | Step              | Shows                                         |
//! |-------------------|-----------------------------------------------|
//! | `TopicEntry`      | Topic field + Continue                        |
//! | `LengthSelection` | Length options, provider picker, generate     |
//! | `ScriptReview`    | Script (read or edit), generate audio         |
//! | `AudioReady`      | Player, download, script, start over          |

use std::time::Duration;

use eframe::egui;
use tokio::sync::mpsc;

use crate::config::{AppConfig, ScriptProvider};
use crate::generation::{GenerationCommand, GenerationOutcome};
use crate::player::{format_time, Player};
use crate::podcast::PodcastLength;
use crate::workflow::{TransitionError, Workflow, WorkflowStep};

const ACCENT: egui::Color32 = egui::Color32::from_rgb(68, 136, 255);
const MUTED: egui::Color32 = egui::Color32::from_rgb(140, 140, 140);
const ERROR: egui::Color32 = egui::Color32::from_rgb(255, 136, 68);
const SUCCESS: egui::Color32 = egui::Color32::from_rgb(80, 200, 120);

/// Something the user asked for during a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    SubmitTopic,
    Back,
    SelectLength(PodcastLength),
    SelectProvider(ScriptProvider),
    GenerateScript,
    QuickGenerate,
    ToggleEdit,
    ScriptEdited,
    GenerateAudio,
    StopWaiting,
    TogglePlayback,
    SkipBack,
    SkipForward,
    Seek(f32),
    Download,
    StartOver,
    DismissError,
}

// ---------------------------------------------------------------------------
// PodcastStudioApp
// ---------------------------------------------------------------------------

pub struct PodcastStudioApp {
    workflow: Workflow,
    player: Player,

    // ── Text field buffers ───────────────────────────────────────────────
    topic_input: String,
    script_input: String,

    /// Player and download feedback (not a workflow error).
    notice: Option<(String, bool)>,

    // ── Channels ─────────────────────────────────────────────────────────
    command_tx: mpsc::Sender<GenerationCommand>,
    result_rx: mpsc::Receiver<GenerationOutcome>,

    config: AppConfig,
}

impl PodcastStudioApp {
    /// * `command_tx` — sender end of the generation command channel.
    /// * `result_rx`  — receiver end of the generation result channel.
    /// * `config`     — loaded application configuration.
    pub fn new(
        command_tx: mpsc::Sender<GenerationCommand>,
        result_rx: mpsc::Receiver<GenerationOutcome>,
        config: AppConfig,
    ) -> Self {
        Self {
            workflow: Workflow::from_config(&config),
            player: Player::new(),
            topic_input: String::new(),
            script_input: String::new(),
            notice: None,
            command_tx,
            result_rx,
            config,
        }
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    // ── Channel polling ──────────────────────────────────────────────────

    /// Drain all pending generation results (non-blocking).
    fn poll_results(&mut self) {
        while let Ok(outcome) = self.result_rx.try_recv() {
            if self.workflow.apply(outcome) {
                self.script_input = self.workflow.state().edited_script().to_string();
            }
        }
    }

    /// Hand a request to the worker.  If the worker is gone the request is
    /// abandoned so the UI does not wait forever.
    fn dispatch(&mut self, command: GenerationCommand) {
        let id = command.id();
        if let Err(e) = self.command_tx.try_send(command) {
            log::error!("app: could not queue request {id}: {e}");
            self.workflow.abandon_request();
            self.notice = Some(("The generation service is not available".into(), true));
        }
    }

    /// Load the finished episode into the player, or release it when the
    /// workflow has moved on.
    fn sync_player(&mut self) {
        let state = self.workflow.state();
        let ready = match (state.step(), state.record()) {
            (WorkflowStep::AudioReady, Some(record)) => record.audio().map(|a| (record.id(), a)),
            _ => None,
        };

        match ready {
            Some((id, clip)) if !self.player.is_loaded(id) => {
                if let Err(e) = self.player.load(id, clip) {
                    log::warn!("app: playback unavailable: {e}");
                    self.notice = Some((format!("Playback unavailable: {e}"), true));
                }
            }
            Some(_) => {}
            None => self.player.unload(),
        }

        self.player.tick();
    }

    // ── Actions ──────────────────────────────────────────────────────────

    /// Apply one user action.
    pub fn perform(&mut self, action: Action) {
        let result = match action {
            Action::SubmitTopic => {
                let topic = self.topic_input.clone();
                self.workflow.submit_topic(&topic)
            }
            Action::Back => self.workflow.back().map(|()| {
                self.topic_input = self.workflow.state().topic().to_string();
            }),
            Action::SelectLength(length) => self.workflow.select_length(length),
            Action::SelectProvider(provider) => self.workflow.select_provider(provider),
            Action::GenerateScript => self
                .workflow
                .begin_script_generation()
                .map(|r| self.dispatch(r.into())),
            Action::QuickGenerate => self
                .workflow
                .begin_quick_generation()
                .map(|r| self.dispatch(r.into())),
            Action::ToggleEdit => self.workflow.toggle_edit(),
            Action::ScriptEdited => self.workflow.edit_script(self.script_input.clone()),
            Action::GenerateAudio => self
                .workflow
                .begin_audio_generation()
                .map(|r| self.dispatch(r.into())),
            Action::StopWaiting => {
                self.workflow.abandon_request();
                Ok(())
            }
            Action::StartOver => self.workflow.start_over().map(|()| {
                self.topic_input.clear();
                self.script_input.clear();
                self.notice = None;
            }),
            Action::DismissError => {
                self.workflow.dismiss_error();
                self.notice = None;
                Ok(())
            }
            Action::TogglePlayback => self.player_action(|p| p.toggle().map(|_| ())),
            Action::SkipBack => self.player_action(Player::skip_back),
            Action::SkipForward => self.player_action(Player::skip_forward),
            Action::Seek(secs) => {
                self.player_action(|p| p.seek(Duration::from_secs_f32(secs.max(0.0))))
            }
            Action::Download => {
                self.download();
                Ok(())
            }
        };

        match result {
            Ok(()) => {}
            // Validation failures are already stored on the workflow.
            Err(TransitionError::Invalid(_)) => {}
            Err(e) => log::debug!("app: {action:?} ignored: {e}"),
        }
    }

    fn player_action<F>(&mut self, f: F) -> Result<(), TransitionError>
    where
        F: FnOnce(&mut Player) -> Result<(), crate::player::PlayerError>,
    {
        if let Err(e) = f(&mut self.player) {
            log::warn!("app: player: {e}");
            self.notice = Some((e.to_string(), true));
        }
        Ok(())
    }

    /// Write the episode's audio to the download directory.
    fn download(&mut self) {
        let Some(record) = self.workflow.state().record() else {
            return;
        };
        let Some(clip) = record.audio() else {
            return;
        };

        let dir = self.config.ui.resolved_download_dir();
        self.notice = Some(match clip.save_to(&dir, &record.file_stem()) {
            Ok(path) => {
                log::info!("app: saved {}", path.display());
                (format!("Saved to {}", path.display()), false)
            }
            Err(e) => {
                log::error!("app: download failed: {e}");
                (format!("Download failed: {e}"), true)
            }
        });
    }

    // ── Shared widgets ───────────────────────────────────────────────────

    /// "1 Topic › 2 Length › 3 Script › 4 Listen", current step highlighted.
    fn draw_progress(&self, ui: &mut egui::Ui) {
        let current = self.workflow.state().step();
        ui.horizontal(|ui| {
            for (i, step) in WorkflowStep::ALL.iter().enumerate() {
                if i > 0 {
                    ui.label(egui::RichText::new("›").color(MUTED));
                }
                let text = egui::RichText::new(format!("{} {}", step.number(), step.label()));
                let text = if *step == current {
                    text.color(ACCENT).strong()
                } else {
                    text.color(MUTED)
                };
                ui.label(text);
            }
        });
    }

    fn draw_error(&self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        let workflow_error = self.workflow.state().error();
        let notice = self.notice.as_ref();
        if workflow_error.is_none() && notice.is_none() {
            return;
        }

        ui.add_space(4.0);
        ui.horizontal_wrapped(|ui| {
            if let Some(msg) = workflow_error {
                ui.label(egui::RichText::new(msg).color(ERROR));
            } else if let Some((msg, is_error)) = notice {
                ui.label(egui::RichText::new(msg.as_str()).color(if *is_error {
                    ERROR
                } else {
                    SUCCESS
                }));
            }
            if ui.small_button("Dismiss").clicked() {
                actions.push(Action::DismissError);
            }
        });
    }

    fn draw_busy(&self, ui: &mut egui::Ui, message: &str, actions: &mut Vec<Action>) {
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(egui::RichText::new(message).color(ACCENT));
        });
        if ui.small_button("Stop waiting").clicked() {
            actions.push(Action::StopWaiting);
        }
    }

    // ── Step panels ──────────────────────────────────────────────────────

    fn draw_topic_entry(&mut self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        ui.heading("What should your podcast be about?");
        ui.add_space(6.0);

        let response = ui.add(
            egui::TextEdit::multiline(&mut self.topic_input)
                .hint_text("e.g. The history of space exploration")
                .desired_rows(3)
                .desired_width(f32::INFINITY),
        );
        let submitted = response.has_focus()
            && ui.input(|i| i.key_pressed(egui::Key::Enter) && i.modifiers.command);

        ui.add_space(6.0);
        let can_continue = !self.topic_input.trim().is_empty();
        if ui
            .add_enabled(can_continue, egui::Button::new("Continue"))
            .clicked()
            || submitted
        {
            actions.push(Action::SubmitTopic);
        }
    }

    fn draw_length_selection(&self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        let state = self.workflow.state();
        let busy = state.is_busy();

        ui.heading("How long should it be?");
        ui.label(egui::RichText::new(state.topic()).italics().color(MUTED));
        ui.add_space(6.0);

        ui.add_enabled_ui(!busy, |ui| {
            for length in PodcastLength::ALL {
                let selected = state.length() == length;
                ui.horizontal(|ui| {
                    if ui.radio(selected, length.label()).clicked() && !selected {
                        actions.push(Action::SelectLength(length));
                    }
                    ui.label(
                        egui::RichText::new(format!(
                            "~{} words · {}",
                            length.word_count(),
                            length.description()
                        ))
                        .color(MUTED)
                        .size(11.0),
                    );
                });
            }

            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.label("Script writer:");
                egui::ComboBox::from_id_salt("script-provider")
                    .selected_text(state.provider().label())
                    .show_ui(ui, |ui| {
                        for provider in ScriptProvider::ALL {
                            let selected = state.provider() == provider;
                            if ui.selectable_label(selected, provider.label()).clicked()
                                && !selected
                            {
                                actions.push(Action::SelectProvider(provider));
                            }
                        }
                    });
            });

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Back").clicked() {
                    actions.push(Action::Back);
                }
                if ui.button("Generate script").clicked() {
                    actions.push(Action::GenerateScript);
                }
                if ui
                    .button("Quick generate")
                    .on_hover_text("Write the script and record it without review")
                    .clicked()
                {
                    actions.push(Action::QuickGenerate);
                }
            });
        });

        if busy {
            self.draw_busy(ui, "Writing your podcast…", actions);
        }
    }

    fn draw_script_review(&mut self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        let state = self.workflow.state();
        let Some(record) = state.record() else {
            return;
        };
        let busy = state.is_busy();
        let editing = state.is_editing();

        ui.heading(record.title());
        ui.label(egui::RichText::new(record.length_label()).color(MUTED));
        ui.add_space(6.0);

        ui.add_enabled_ui(!busy, |ui| {
            let toggle = if editing { "Done editing" } else { "Edit script" };
            if ui.button(toggle).clicked() {
                actions.push(Action::ToggleEdit);
            }
        });

        egui::ScrollArea::vertical()
            .max_height((ui.available_height() - 80.0).max(120.0))
            .show(ui, |ui| {
                if editing {
                    let response = ui.add_enabled(
                        !busy,
                        egui::TextEdit::multiline(&mut self.script_input)
                            .desired_width(f32::INFINITY)
                            .desired_rows(16),
                    );
                    if response.changed() {
                        actions.push(Action::ScriptEdited);
                    }
                } else {
                    ui.label(record.script());
                }
            });

        ui.add_space(8.0);
        ui.add_enabled_ui(!busy, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Back").clicked() {
                    actions.push(Action::Back);
                }
                if ui.button("Generate audio").clicked() {
                    actions.push(Action::GenerateAudio);
                }
            });
        });

        if busy {
            self.draw_busy(ui, "Recording the narration…", actions);
        }
    }

    fn draw_audio_ready(&self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        let Some(record) = self.workflow.state().record() else {
            return;
        };

        ui.heading(record.title());
        ui.label(
            egui::RichText::new(format!(
                "{} · created {}",
                record.length_label(),
                record.created_at().format("%Y-%m-%d %H:%M")
            ))
            .color(MUTED),
        );
        ui.add_space(8.0);

        self.draw_player(ui, actions);

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button("Download").clicked() {
                actions.push(Action::Download);
            }
            if ui.button("Start over").clicked() {
                actions.push(Action::StartOver);
            }
        });

        ui.add_space(6.0);
        ui.collapsing("Script", |ui| {
            egui::ScrollArea::vertical().max_height(240.0).show(ui, |ui| {
                ui.label(record.script());
            });
        });
    }

    fn draw_player(&self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        let clock = self.player.clock();

        ui.horizontal(|ui| {
            if ui.button("−10s").clicked() {
                actions.push(Action::SkipBack);
            }
            let label = if clock.is_playing() { "Pause" } else { "Play" };
            if ui.button(label).clicked() {
                actions.push(Action::TogglePlayback);
            }
            if ui.button("+10s").clicked() {
                actions.push(Action::SkipForward);
            }
        });

        let total = clock.duration();
        let mut position = clock.position().as_secs_f32();
        ui.horizontal(|ui| {
            ui.label(format_time(clock.position()));
            if let Some(total) = total {
                let response = ui.add(
                    egui::Slider::new(&mut position, 0.0..=total.as_secs_f32()).show_value(false),
                );
                if response.drag_stopped() || (response.changed() && !response.dragged()) {
                    actions.push(Action::Seek(position));
                }
                ui.label(format_time(total));
            } else {
                ui.add(egui::ProgressBar::new(clock.progress()).desired_width(200.0));
            }
        });
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for PodcastStudioApp {
    /// Called every frame by eframe.  Polls the worker, syncs the player,
    /// renders the current step, then applies the actions it produced.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // --- Poll non-blocking channels ------------------------------------
        self.poll_results();
        self.sync_player();

        // --- Schedule repaints while something is moving -----------------
        if self.workflow.state().is_busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        } else if self.player.clock().is_playing() {
            ctx.request_repaint_after(Duration::from_millis(250));
        }

        let mut actions = Vec::new();

        egui::TopBottomPanel::top("progress").show(ctx, |ui| {
            ui.add_space(4.0);
            self.draw_progress(ui);
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_error(ui, &mut actions);
            ui.add_space(4.0);

            match self.workflow.state().step() {
                WorkflowStep::TopicEntry => self.draw_topic_entry(ui, &mut actions),
                WorkflowStep::LengthSelection => self.draw_length_selection(ui, &mut actions),
                WorkflowStep::ScriptReview => self.draw_script_review(ui, &mut actions),
                WorkflowStep::AudioReady => self.draw_audio_ready(ui, &mut actions),
            }
        });

        for action in actions {
            self.perform(action);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.player.unload();
        log::info!("Podcast Studio closing");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
