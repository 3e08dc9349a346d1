//! Application entry point — Podcast Studio.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (default on first run) and pull API keys
//!    from the environment.
//! 3. Create the [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Build the [`GenerationClient`] from config.
//! 5. Create the generation channels and spawn the worker.
//! 6. Run [`eframe::run_native`]; blocks until the window is closed.

use anyhow::{anyhow, Context};
use tokio::sync::mpsc;

use podcast_studio::{
    app::PodcastStudioApp,
    config::AppConfig,
    generation::{run_worker, GenerationClient, GenerationCommand, GenerationOutcome},
};

use eframe::egui;

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let (w, h) = config.ui.window_size;
    eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Podcast Studio")
            .with_inner_size([w, h])
            .with_min_inner_size([360.0, 420.0]),
        ..Default::default()
    }
}

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Podcast Studio starting up");

    // 2. Configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e:#}); using defaults");
        AppConfig::default()
    });
    config.apply_env();

    for var in config.missing_credentials() {
        log::warn!("{var} is not set; requests that need it will fail");
    }

    // 3. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 4. Providers
    let client = GenerationClient::from_config(&config);

    // 5. Channels + worker
    let (command_tx, command_rx) = mpsc::channel::<GenerationCommand>(8);
    let (result_tx, result_rx) = mpsc::channel::<GenerationOutcome>(8);
    rt.spawn(run_worker(client, command_rx, result_tx));

    // 6. UI (blocks until the window is closed)
    let options = native_options(&config);
    let app = PodcastStudioApp::new(command_tx, result_rx, config);

    eframe::run_native(
        "Podcast Studio",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow!("UI error: {e}"))?;

    rt.shutdown_timeout(std::time::Duration::from_secs(1));
    log::info!("Podcast Studio shut down");
    Ok(())
}
