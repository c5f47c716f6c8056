//! Application entry point — Live Translate.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create [`tokio`] runtime (multi-thread, 2 workers) and enter it.
//! 4. Build the translator ([`ApiTranslator`]) from config.
//! 5. Start the [`TranslationSession`] (store, debounce timer, orchestrator).
//! 6. Run [`eframe::run_native`] — blocks the main thread until the window
//!    is closed.

use std::sync::Arc;

use anyhow::Context as _;
use eframe::egui;
use live_translate::{
    app::TranslateApp,
    config::AppConfig,
    output::{CommandSpeaker, SystemClipboard},
    pipeline::TranslationSession,
    translate::ApiTranslator,
};

// ---------------------------------------------------------------------------
// Native options builder
// ---------------------------------------------------------------------------

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let (width, height) = config.ui.window_size;
    let mut vp = egui::ViewportBuilder::default()
        .with_title("Live Translate")
        .with_inner_size([width, height])
        .with_min_inner_size([480.0, 240.0]);

    if config.ui.always_on_top {
        vp = vp.with_always_on_top();
    }

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Live Translate starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime; entered so the session can capture its handle
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;
    let _guard = rt.enter();

    // 4. Translator
    let translator = Arc::new(ApiTranslator::from_config(&config.translator));
    if config.translator.provider.requires_api_key()
        && config.translator.resolved_api_key().is_none()
    {
        log::warn!("No API key configured; translations will show an error");
    }

    // 5. Session
    let session = TranslationSession::start(
        &config,
        translator,
        Arc::new(SystemClipboard),
        Arc::new(CommandSpeaker::default()),
    );

    // 6. Window (blocks until closed)
    let app = TranslateApp::new(session, &config);
    let options = native_options(&config);

    eframe::run_native(
        "Live Translate",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("window error: {e}"))
}
