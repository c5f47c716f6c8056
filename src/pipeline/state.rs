//! Translation session state and the store that owns it.
//!
//! [`TranslationState`] is the plain snapshot the UI renders: languages, source
//! text, result text and the in-flight flag.
//!
//! [`TranslationStore`] wraps it with the setters, the
//! [`interchange_languages`](TranslationStore::interchange_languages) action
//! and the request counter the orchestrator uses to drop stale responses.
//!
//! [`SharedStore`] is `Arc<Mutex<TranslationStore>>`, shared between the UI
//! thread and the orchestrator task.  Every mutation happens under one lock,
//! so observers never see a half-applied transition.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::config::SessionConfig;
use crate::language::{Language, SourceLanguage};

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

/// Actions the store refuses to perform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// An auto-detected source has no concrete language to move into the
    /// target slot.
    #[error("cannot interchange languages while the source language is auto-detected")]
    AutoSourceLanguage,
}

// ---------------------------------------------------------------------------
// RequestId
// ---------------------------------------------------------------------------

/// Monotonically increasing id of a dispatched translation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// TranslationState
// ---------------------------------------------------------------------------

/// Snapshot of one translation session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationState {
    pub from_language: SourceLanguage,
    pub to_language: Language,
    /// User-entered source text.
    pub from_text: String,
    /// Last translation, a user edit of the output, or the error marker.
    pub result: String,
    /// `true` while the current request is outstanding.
    pub loading: bool,
}

impl TranslationState {
    pub fn new(from_language: SourceLanguage, to_language: Language) -> Self {
        Self {
            from_language,
            to_language,
            from_text: String::new(),
            result: String::new(),
            loading: false,
        }
    }

    /// Whether [`TranslationStore::interchange_languages`] would succeed.
    pub fn can_interchange(&self) -> bool {
        !self.from_language.is_auto()
    }
}

impl Default for TranslationState {
    fn default() -> Self {
        Self::new(SourceLanguage::Auto, Language::English)
    }
}

// ---------------------------------------------------------------------------
// TranslationStore
// ---------------------------------------------------------------------------

/// Single source of truth for a translation session.
///
/// Setters are plain assignments; the language types already rule out an
/// unsupported code or `auto` in the target slot.
#[derive(Debug, Default)]
pub struct TranslationStore {
    state: TranslationState,
    latest_request: RequestId,
}

impl TranslationStore {
    pub fn new(from_language: SourceLanguage, to_language: Language) -> Self {
        Self {
            state: TranslationState::new(from_language, to_language),
            latest_request: RequestId::default(),
        }
    }

    /// Fresh store with the configured default language pair.
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.default_from, config.default_to)
    }

    /// Owned copy of the current state.
    pub fn snapshot(&self) -> TranslationState {
        self.state.clone()
    }

    /// Borrow the current state without cloning.
    pub fn state(&self) -> &TranslationState {
        &self.state
    }

    pub fn set_from_language(&mut self, language: SourceLanguage) {
        self.state.from_language = language;
    }

    pub fn set_to_language(&mut self, language: Language) {
        self.state.to_language = language;
    }

    pub fn set_from_text(&mut self, text: impl Into<String>) {
        self.state.from_text = text.into();
    }

    pub fn set_result(&mut self, text: impl Into<String>) {
        self.state.result = text.into();
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.state.loading = loading;
    }

    /// Swap the language pair and move the result into the source text.
    ///
    /// ```
    /// use live_translate::language::{Language, SourceLanguage};
    /// use live_translate::pipeline::TranslationStore;
    ///
    /// let mut store = TranslationStore::new(Language::English.into(), Language::Spanish);
    /// store.set_from_text("hello");
    /// store.set_result("hola");
    /// store.interchange_languages().unwrap();
    ///
    /// let st = store.snapshot();
    /// assert_eq!(st.from_language, SourceLanguage::Language(Language::Spanish));
    /// assert_eq!(st.to_language, Language::English);
    /// assert_eq!(st.from_text, "hola");
    /// assert_eq!(st.result, "hello");
    /// ```
    ///
    /// # Errors
    ///
    /// [`StoreError::AutoSourceLanguage`] when the source is auto-detected; the
    /// state is left untouched.
    pub fn interchange_languages(&mut self) -> Result<(), StoreError> {
        let Some(from) = self.state.from_language.concrete() else {
            return Err(StoreError::AutoSourceLanguage);
        };

        let st = &mut self.state;
        st.from_language = SourceLanguage::Language(st.to_language);
        st.to_language = from;
        std::mem::swap(&mut st.from_text, &mut st.result);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Request bookkeeping (orchestrator side)
    // -----------------------------------------------------------------------

    /// Register a newly dispatched request: it supersedes every earlier one.
    pub fn begin_request(&mut self) -> RequestId {
        self.latest_request = RequestId(self.latest_request.0 + 1);
        self.state.loading = true;
        self.latest_request
    }

    /// Apply the outcome of request `id`.
    ///
    /// `result` of `None` keeps the current text.  Returns `false`, leaving
    /// the state untouched, when `id` has been superseded.
    pub fn finish_request(&mut self, id: RequestId, result: Option<String>) -> bool {
        if id != self.latest_request {
            return false;
        }
        if let Some(text) = result {
            self.state.result = text;
        }
        self.state.loading = false;
        true
    }

    /// Id of the most recently dispatched request.
    pub fn latest_request(&self) -> RequestId {
        self.latest_request
    }
}

// ---------------------------------------------------------------------------
// SharedStore
// ---------------------------------------------------------------------------

/// Thread-safe handle to a [`TranslationStore`].
///
/// Keep critical sections short; never hold the guard across `.await`.
pub type SharedStore = Arc<Mutex<TranslationStore>>;

/// Construct a new [`SharedStore`].
pub fn new_shared_store(from_language: SourceLanguage, to_language: Language) -> SharedStore {
    Arc::new(Mutex::new(TranslationStore::new(from_language, to_language)))
}

/// Lock the store, recovering the data if a previous holder panicked.
pub fn lock_store(store: &SharedStore) -> MutexGuard<'_, TranslationStore> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
