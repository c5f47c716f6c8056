//! Translation provider module for Live Translate.
//!
//! This module provides:
//! * [`Translator`] — async trait implemented by all provider backends.
//! * [`ApiTranslator`] — OpenAI-compatible chat-completions backend.
//! * [`PromptBuilder`] — builds the tagged few-shot chat prompt.
//! * [`TranslationRequest`] — the `(from, to, text)` tuple of one lookup.
//! * [`TranslateError`] — error variants for a lookup.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use live_translate::config::AppConfig;
//! use live_translate::language::{Language, SourceLanguage};
//! use live_translate::translate::{ApiTranslator, TranslationRequest, Translator};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let translator = ApiTranslator::from_config(&config.translator);
//!
//!     let request = TranslationRequest::new(SourceLanguage::Auto, Language::Spanish, "hello");
//!     let translated = translator.translate(&request).await.unwrap();
//!     println!("{translated}");
//! }
//! ```

pub mod prompt;
pub mod translator;

#[cfg(test)]
pub mod mock;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use prompt::PromptBuilder;
pub use translator::{ApiTranslator, TranslateError, TranslationRequest, Translator};

#[cfg(test)]
pub use mock::MockTranslator;
