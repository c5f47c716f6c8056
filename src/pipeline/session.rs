//! Translation session — owns the store, the debounce timer and the
//! orchestrator task, and exposes the user intents the UI forwards.
//!
//! ```text
//! UI intent ──▶ TranslationSession
//!                 ├─ set_from_text ─────▶ store + Debouncer::push ──(D)──┐
//!                 ├─ set_*_language ────▶ store + Notify ────────────────┤
//!                 ├─ interchange ───────▶ store swap + Notify + push ────┤
//!                 ├─ set_result ────────▶ store                          ▼
//!                 ├─ copy / speak ──────▶ output (errors swallowed)   orchestrator task
//!                 └─ shutdown / Drop ───▶ cancel timer, abort task
//! ```
//!
//! Construct it inside a tokio runtime context; afterwards every method may be
//! called from any thread (the egui update loop included).

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;

use crate::config::{AppConfig, SpeechConfig};
use crate::language::{Language, SourceLanguage};
use crate::output::{ClipboardWriter, Speaker};
use crate::translate::Translator;

use super::debounce::Debouncer;
use super::runner::TranslationOrchestrator;
use super::state::{lock_store, SharedStore, StoreError, TranslationState, TranslationStore};

/// One running translation session.
pub struct TranslationSession {
    store: SharedStore,
    debouncer: Debouncer<String>,
    languages_changed: Arc<Notify>,
    orchestrator: Option<JoinHandle<()>>,
    clipboard: Arc<dyn ClipboardWriter>,
    speaker: Arc<dyn Speaker>,
    speech: SpeechConfig,
}

impl TranslationSession {
    /// Start a session on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime context.
    pub fn start(
        config: &AppConfig,
        translator: Arc<dyn Translator>,
        clipboard: Arc<dyn ClipboardWriter>,
        speaker: Arc<dyn Speaker>,
    ) -> Self {
        let runtime = Handle::current();
        let store: SharedStore = Arc::new(std::sync::Mutex::new(TranslationStore::from_config(
            &config.session,
        )));

        let (text_tx, text_rx) = mpsc::unbounded_channel();
        let debouncer =
            Debouncer::with_runtime(config.session.debounce(), text_tx, runtime.clone());
        let languages_changed = Arc::new(Notify::new());

        let orchestrator = TranslationOrchestrator::new(Arc::clone(&store), translator);
        let task = runtime.spawn(orchestrator.run(text_rx, Arc::clone(&languages_changed)));

        log::info!(
            "session: started ({} -> {}, debounce {} ms)",
            config.session.default_from,
            config.session.default_to,
            config.session.debounce_ms
        );

        Self {
            store,
            debouncer,
            languages_changed,
            orchestrator: Some(task),
            clipboard,
            speaker,
            speech: config.speech.clone(),
        }
    }

    // -----------------------------------------------------------------------
    // Observation
    // -----------------------------------------------------------------------

    /// Handle to the underlying store.
    pub fn store(&self) -> SharedStore {
        Arc::clone(&self.store)
    }

    pub fn snapshot(&self) -> TranslationState {
        lock_store(&self.store).snapshot()
    }

    // -----------------------------------------------------------------------
    // User intents
    // -----------------------------------------------------------------------

    pub fn set_from_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        lock_store(&self.store).set_from_text(text.clone());
        self.debouncer.push(text);
    }

    pub fn set_from_language(&mut self, language: SourceLanguage) {
        lock_store(&self.store).set_from_language(language);
        self.languages_changed.notify_one();
    }

    pub fn set_to_language(&mut self, language: Language) {
        lock_store(&self.store).set_to_language(language);
        self.languages_changed.notify_one();
    }

    /// Direct edit of the output area.
    pub fn set_result(&mut self, text: impl Into<String>) {
        lock_store(&self.store).set_result(text);
    }

    /// Swap languages and texts; the new source text is re-debounced.
    ///
    /// # Errors
    ///
    /// [`StoreError::AutoSourceLanguage`] while the source is auto-detected.
    pub fn interchange_languages(&mut self) -> Result<(), StoreError> {
        let from_text = {
            let mut store = lock_store(&self.store);
            store.interchange_languages()?;
            store.state().from_text.clone()
        };
        self.languages_changed.notify_one();
        self.debouncer.push(from_text);
        Ok(())
    }

    /// Copy the current result to the clipboard.  Failures are swallowed.
    pub fn copy_result(&self) {
        let result = lock_store(&self.store).state().result.clone();
        if let Err(e) = self.clipboard.write_text(&result) {
            log::debug!("session: copy failed: {e}");
        }
    }

    /// Speak the current result with the target language's voice.  Failures
    /// are swallowed.
    pub fn speak_result(&self) {
        if !self.speech.enabled {
            return;
        }
        let (result, to) = {
            let store = lock_store(&self.store);
            (store.state().result.clone(), store.state().to_language)
        };
        if result.trim().is_empty() {
            return;
        }
        if let Err(e) = self
            .speaker
            .speak(&result, to.voice_locale(), self.speech.rate)
        {
            log::warn!("session: speech failed: {e}");
        }
    }

    // -----------------------------------------------------------------------
    // Teardown
    // -----------------------------------------------------------------------

    /// Cancel the pending debounce emission and stop the orchestrator.
    ///
    /// Lookups already in flight are left to finish; their outcomes land in
    /// the (now unobserved) store.
    pub fn shutdown(&mut self) {
        self.debouncer.cancel();
        if let Some(task) = self.orchestrator.take() {
            task.abort();
            log::info!("session: shut down");
        }
    }

    pub fn is_running(&self) -> bool {
        self.orchestrator
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

impl Drop for TranslationSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
