//! Debounced translation pipeline.
//!
//! This module wires typed text → debounce → translator → store and exposes
//! the session the UI drives and reads every frame.
//!
//! # Architecture
//!
//! ```text
//! set_from_text ─▶ Debouncer (owned timer, D = debounce_ms)
//!                       │ settled text (mpsc)
//!                       ▼
//! set_*_language ─▶ TranslationOrchestrator::run()  ← async tokio task
//!    (Notify)           │
//!                       ├─ begin_request()  → loading = true, id = n
//!                       └─ spawn Translator::translate(from, to, text)
//!                               └─▶ finish_request(n, ..)  (dropped if n is stale)
//!
//! SharedStore (Arc<Mutex<TranslationStore>>) ←─── read by egui update() each frame
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use live_translate::config::AppConfig;
//! use live_translate::output::{CommandSpeaker, SystemClipboard};
//! use live_translate::pipeline::TranslationSession;
//! use live_translate::translate::ApiTranslator;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let translator = Arc::new(ApiTranslator::from_config(&config.translator));
//!
//!     let mut session = TranslationSession::start(
//!         &config,
//!         translator,
//!         Arc::new(SystemClipboard),
//!         Arc::new(CommandSpeaker::default()),
//!     );
//!
//!     session.set_from_text("hello");
//!     tokio::time::sleep(std::time::Duration::from_secs(2)).await;
//!     println!("{}", session.snapshot().result);
//! }
//! ```

pub mod debounce;
pub mod runner;
pub mod session;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use debounce::Debouncer;
pub use runner::{TranslationOrchestrator, ERROR_MARKER};
pub use session::TranslationSession;
pub use state::{
    lock_store, new_shared_store, RequestId, SharedStore, StoreError, TranslationState,
    TranslationStore,
};
