//! Translation orchestrator — bridges debounced input to the translator and
//! writes outcomes back into the [`SharedStore`].
//!
//! # Flow
//!
//! ```text
//! debounced text (mpsc) ──┐
//!                         ├─▶ trigger()
//! language change (Notify)┘      │  capture (from, to, text)
//!                                │  skip if text == "" or tuple unchanged
//!                                │  begin_request() → id, loading = true
//!                                └─▶ spawn translator.translate(..)
//!                                        │
//!                                        ▼
//!                             finish_request(id, outcome)
//!                               ├─ id superseded → discard
//!                               ├─ Ok("")        → result unchanged
//!                               ├─ Ok(text)      → result = text
//!                               └─ Err(_)        → result = "Error"
//! ```
//!
//! Lookups are never cancelled; overlapping lookups run to completion and the
//! request id decides which one may write.

use std::sync::Arc;

use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;

use crate::language::{Language, SourceLanguage};
use crate::translate::{TranslateError, TranslationRequest, Translator};

use super::state::{lock_store, RequestId, SharedStore};

/// Shown in place of the result when a lookup fails.
pub const ERROR_MARKER: &str = "Error";

// ---------------------------------------------------------------------------
// TranslationOrchestrator
// ---------------------------------------------------------------------------

/// Dispatches translation lookups and reconciles their outcomes.
///
/// Drive it with [`run`](Self::run) inside a tokio task, or call
/// [`on_debounced_text`](Self::on_debounced_text) /
/// [`trigger`](Self::trigger) directly.
pub struct TranslationOrchestrator {
    store: SharedStore,
    translator: Arc<dyn Translator>,
    debounced_text: String,
    /// Tuple seen by the previous trigger, dispatched or not.
    last_seen: Option<(SourceLanguage, Language, String)>,
}

impl TranslationOrchestrator {
    pub fn new(store: SharedStore, translator: Arc<dyn Translator>) -> Self {
        Self {
            store,
            translator,
            debounced_text: String::new(),
            last_seen: None,
        }
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Run until the debounced-text channel closes.
    ///
    /// `debounced` carries settled source text; `languages_changed` is
    /// notified after every language selection or swap.
    pub async fn run(
        mut self,
        mut debounced: mpsc::UnboundedReceiver<String>,
        languages_changed: Arc<Notify>,
    ) {
        loop {
            tokio::select! {
                text = debounced.recv() => match text {
                    Some(text) => {
                        self.on_debounced_text(text);
                    }
                    None => break,
                },
                _ = languages_changed.notified() => {
                    self.trigger();
                }
            }
        }

        log::info!("orchestrator: input channel closed, shutting down");
    }

    // -----------------------------------------------------------------------
    // Triggers
    // -----------------------------------------------------------------------

    /// Record newly settled source text and re-evaluate.
    pub fn on_debounced_text(&mut self, text: String) -> Option<JoinHandle<()>> {
        self.debounced_text = text;
        self.trigger()
    }

    /// Dispatch a lookup for the current `(from, to, debounced text)` tuple.
    ///
    /// Returns the handle of the spawned lookup, or `None` when nothing was
    /// dispatched (empty text, or the tuple has not changed since the last
    /// trigger).
    pub fn trigger(&mut self) -> Option<JoinHandle<()>> {
        let (from, to) = {
            let st = lock_store(&self.store);
            (st.state().from_language, st.state().to_language)
        };

        let tuple = (from, to, self.debounced_text.clone());
        if self.last_seen.as_ref() == Some(&tuple) {
            return None;
        }
        self.last_seen = Some(tuple);

        if self.debounced_text.is_empty() {
            log::debug!("orchestrator: empty input, no request");
            return None;
        }

        let request = TranslationRequest::new(from, to, self.debounced_text.clone());
        let id = lock_store(&self.store).begin_request();
        log::debug!(
            "orchestrator: dispatch {id} {} -> {} ({} chars)",
            request.from,
            request.to,
            request.text.len()
        );

        let store = Arc::clone(&self.store);
        let translator = Arc::clone(&self.translator);
        Some(tokio::spawn(async move {
            let outcome = translator.translate(&request).await;
            apply_outcome(&store, id, outcome);
        }))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Write the outcome of request `id` into the store unless it is stale.
fn apply_outcome(store: &SharedStore, id: RequestId, outcome: Result<String, TranslateError>) {
    let result = match outcome {
        Ok(text) if text.is_empty() => {
            log::debug!("orchestrator: {id} returned no text");
            None
        }
        Ok(text) => Some(text),
        Err(e) => {
            log::warn!("orchestrator: {id} failed: {e}");
            Some(ERROR_MARKER.to_string())
        }
    };

    if !lock_store(store).finish_request(id, result) {
        log::debug!("orchestrator: {id} superseded, response discarded");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::state::new_shared_store;
    use crate::translate::MockTranslator;
    use std::time::Duration;
    use tokio::time::sleep;

    fn make_orchestrator(
        translator: MockTranslator,
    ) -> (TranslationOrchestrator, SharedStore) {
        let store = new_shared_store(SourceLanguage::Auto, Language::Spanish);
        let orc = TranslationOrchestrator::new(Arc::clone(&store), Arc::new(translator));
        (orc, store)
    }

    #[tokio::test]
    async fn successful_lookup_sets_result_and_clears_loading() {
        let translator = MockTranslator::new().reply("hello", "hola", Duration::ZERO);
        let calls = translator.calls();
        let (mut orc, store) = make_orchestrator(translator);

        let handle = orc.on_debounced_text("hello".into()).expect("dispatched");
        assert!(lock_store(&store).state().loading);
        handle.await.unwrap();

        let st = lock_store(&store).snapshot();
        assert_eq!(st.result, "hola");
        assert!(!st.loading);
        assert_eq!(
            *calls.lock().unwrap(),
            vec![TranslationRequest::new(
                SourceLanguage::Auto,
                Language::Spanish,
                "hello"
            )]
        );
    }

    #[tokio::test]
    async fn empty_text_dispatches_nothing_and_keeps_result() {
        let translator = MockTranslator::new();
        let calls = translator.calls();
        let (mut orc, store) = make_orchestrator(translator);
        lock_store(&store).set_result("previous");

        assert!(orc.on_debounced_text(String::new()).is_none());
        assert!(orc.trigger().is_none());

        let st = lock_store(&store).snapshot();
        assert_eq!(st.result, "previous");
        assert!(!st.loading);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failure_sets_error_marker() {
        let translator = MockTranslator::new().fail("boom", Duration::ZERO);
        let (mut orc, store) = make_orchestrator(translator);
        lock_store(&store).set_result("previous");

        orc.on_debounced_text("boom".into()).unwrap().await.unwrap();

        let st = lock_store(&store).snapshot();
        assert_eq!(st.result, ERROR_MARKER);
        assert!(!st.loading);
    }

    #[tokio::test]
    async fn empty_translation_keeps_previous_result() {
        let translator = MockTranslator::new().reply("...", "", Duration::ZERO);
        let (mut orc, store) = make_orchestrator(translator);
        lock_store(&store).set_result("previous");

        orc.on_debounced_text("...".into()).unwrap().await.unwrap();

        let st = lock_store(&store).snapshot();
        assert_eq!(st.result, "previous");
        assert!(!st.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn late_stale_response_never_overwrites_newer_one() {
        // A is slow, B is fast: B resolves first, then A.
        let translator = MockTranslator::new()
            .reply("cat", "gato", Duration::from_millis(500))
            .reply("cat dog", "gato perro", Duration::from_millis(100));
        let (mut orc, store) = make_orchestrator(translator);

        let a = orc.on_debounced_text("cat".into()).unwrap();
        let b = orc.on_debounced_text("cat dog".into()).unwrap();

        b.await.unwrap();
        assert_eq!(lock_store(&store).state().result, "gato perro");
        assert!(!lock_store(&store).state().loading);

        a.await.unwrap();
        let st = lock_store(&store).snapshot();
        assert_eq!(st.result, "gato perro");
        assert!(!st.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn early_stale_response_is_discarded_and_loading_stays_on() {
        // A resolves while B is still in flight.
        let translator = MockTranslator::new()
            .reply("cat", "gato", Duration::from_millis(100))
            .reply("cat dog", "gato perro", Duration::from_millis(500));
        let (mut orc, store) = make_orchestrator(translator);

        let a = orc.on_debounced_text("cat".into()).unwrap();
        let b = orc.on_debounced_text("cat dog".into()).unwrap();

        a.await.unwrap();
        {
            let st = lock_store(&store);
            assert!(st.state().result.is_empty());
            assert!(st.state().loading);
        }

        b.await.unwrap();
        let st = lock_store(&store).snapshot();
        assert_eq!(st.result, "gato perro");
        assert!(!st.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_failure_does_not_surface_error() {
        let translator = MockTranslator::new()
            .fail("cat", Duration::from_millis(300))
            .reply("cat dog", "gato perro", Duration::from_millis(10));
        let (mut orc, store) = make_orchestrator(translator);

        let a = orc.on_debounced_text("cat".into()).unwrap();
        let b = orc.on_debounced_text("cat dog".into()).unwrap();
        b.await.unwrap();
        a.await.unwrap();

        assert_eq!(lock_store(&store).state().result, "gato perro");
    }

    #[tokio::test]
    async fn language_change_retriggers_with_same_text() {
        let translator = MockTranslator::new();
        let calls = translator.calls();
        let (mut orc, store) = make_orchestrator(translator);

        orc.on_debounced_text("hello".into()).unwrap().await.unwrap();
        lock_store(&store).set_to_language(Language::German);
        orc.trigger().expect("new tuple dispatches").await.unwrap();

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].to, Language::German);
        assert_eq!(lock_store(&store).state().result, "de:hello");
    }

    #[tokio::test]
    async fn unchanged_tuple_is_not_redispatched() {
        let translator = MockTranslator::new();
        let calls = translator.calls();
        let (mut orc, _store) = make_orchestrator(translator);

        orc.on_debounced_text("hello".into()).unwrap().await.unwrap();
        assert!(orc.trigger().is_none());
        assert!(orc.on_debounced_text("hello".into()).is_none());
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn text_is_retranslated_after_being_cleared() {
        let translator = MockTranslator::new();
        let calls = translator.calls();
        let (mut orc, _store) = make_orchestrator(translator);

        orc.on_debounced_text("hello".into()).unwrap().await.unwrap();
        assert!(orc.on_debounced_text(String::new()).is_none());
        orc.on_debounced_text("hello".into())
            .expect("dispatched again")
            .await
            .unwrap();

        assert_eq!(calls.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn run_consumes_text_and_language_signals() {
        let translator = MockTranslator::new();
        let calls = translator.calls();
        let (orc, store) = make_orchestrator(translator);

        let (tx, rx) = mpsc::unbounded_channel();
        let notify = Arc::new(Notify::new());
        let task = tokio::spawn(orc.run(rx, Arc::clone(&notify)));

        tx.send("hello".to_string()).unwrap();
        sleep(Duration::from_millis(10)).await;
        assert_eq!(lock_store(&store).state().result, "es:hello");

        lock_store(&store).set_to_language(Language::Italian);
        notify.notify_one();
        sleep(Duration::from_millis(10)).await;
        assert_eq!(lock_store(&store).state().result, "it:hello");

        drop(tx);
        task.await.unwrap();
        assert_eq!(calls.lock().unwrap().len(), 2);
    }
}
