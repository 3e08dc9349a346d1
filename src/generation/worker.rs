//! Background generation worker.
//!
//! The UI thread never awaits a network call.  It sends a
//! [`GenerationCommand`] over a `tokio::sync::mpsc` channel and polls the
//! result channel once per frame for the matching [`GenerationOutcome`].
//!
//! ```text
//! UI ──GenerationCommand──▶ run_worker ──GenerationClient──▶ providers
//! UI ◀─GenerationOutcome─── run_worker
//! ```
//!
//! Every command carries the [`RequestId`] issued by the workflow; the
//! outcome echoes it back so stale results can be recognised and dropped.

use std::fmt;

use tokio::sync::mpsc;

use crate::config::ScriptProvider;
use crate::podcast::{AudioClip, PodcastLength, PodcastRecord};

use super::client::GenerationClient;
use super::error::GenerationError;

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Identifies one outstanding generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Generate a script for review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRequest {
    pub id: RequestId,
    pub topic: String,
    pub length: PodcastLength,
    pub provider: ScriptProvider,
}

/// Synthesise the reviewed (possibly edited) script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioRequest {
    pub id: RequestId,
    pub script: String,
}

/// Script and audio in one go, skipping review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodcastRequest {
    pub id: RequestId,
    pub topic: String,
    pub length: PodcastLength,
    pub provider: ScriptProvider,
}

/// Commands sent from the UI to the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationCommand {
    Script(ScriptRequest),
    Audio(AudioRequest),
    Podcast(PodcastRequest),
}

impl GenerationCommand {
    pub fn id(&self) -> RequestId {
        match self {
            GenerationCommand::Script(r) => r.id,
            GenerationCommand::Audio(r) => r.id,
            GenerationCommand::Podcast(r) => r.id,
        }
    }
}

impl From<ScriptRequest> for GenerationCommand {
    fn from(r: ScriptRequest) -> Self {
        GenerationCommand::Script(r)
    }
}

impl From<AudioRequest> for GenerationCommand {
    fn from(r: AudioRequest) -> Self {
        GenerationCommand::Audio(r)
    }
}

impl From<PodcastRequest> for GenerationCommand {
    fn from(r: PodcastRequest) -> Self {
        GenerationCommand::Podcast(r)
    }
}

/// Results sent from the worker back to the UI.
#[derive(Debug)]
pub enum GenerationOutcome {
    Script {
        id: RequestId,
        result: Result<String, GenerationError>,
    },
    Audio {
        id: RequestId,
        result: Result<AudioClip, GenerationError>,
    },
    Podcast {
        id: RequestId,
        result: Result<PodcastRecord, GenerationError>,
    },
}

impl GenerationOutcome {
    pub fn id(&self) -> RequestId {
        match self {
            GenerationOutcome::Script { id, .. }
            | GenerationOutcome::Audio { id, .. }
            | GenerationOutcome::Podcast { id, .. } => *id,
        }
    }
}

// ---------------------------------------------------------------------------
// Worker loop
// ---------------------------------------------------------------------------

/// Execute a single command.
pub async fn execute(client: &GenerationClient, command: GenerationCommand) -> GenerationOutcome {
    match command {
        GenerationCommand::Script(r) => GenerationOutcome::Script {
            id: r.id,
            result: client.generate_script(&r.topic, r.length, r.provider).await,
        },
        GenerationCommand::Audio(r) => GenerationOutcome::Audio {
            id: r.id,
            result: client.synthesize_audio(&r.script).await,
        },
        GenerationCommand::Podcast(r) => GenerationOutcome::Podcast {
            id: r.id,
            result: client.generate_podcast(&r.topic, r.length, r.provider).await,
        },
    }
}

/// Serve commands until `command_rx` closes or the result receiver is dropped.
///
/// Spawn on the tokio runtime from `main()`.  Each command runs in its own
/// task, so a request the workflow has abandoned never holds up the next one.
/// Its outcome still arrives later and is dropped by the workflow as stale.
pub async fn run_worker(
    client: GenerationClient,
    mut command_rx: mpsc::Receiver<GenerationCommand>,
    result_tx: mpsc::Sender<GenerationOutcome>,
) {
    while let Some(command) = command_rx.recv().await {
        let id = command.id();
        if result_tx.is_closed() {
            log::info!("worker: result channel closed, dropping request {id}");
            break;
        }
        log::debug!("worker: request {id} received");

        let client = client.clone();
        let result_tx = result_tx.clone();
        tokio::spawn(async move {
            let outcome = execute(&client, command).await;
            if result_tx.send(outcome).await.is_err() {
                log::debug!("worker: result channel closed, request {id} discarded");
            }
        });
    }

    log::info!("worker: command channel closed, shutting down");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
