//! Live Translate — type text, pick a language pair, watch the translation
//! update as you type.
//!
//! * [`pipeline`] — debounce, state store, orchestrator, session.
//! * [`translate`] — the `Translator` trait and its HTTP backend.
//! * [`language`] — supported languages, `auto`, voice locales.
//! * [`output`] — clipboard copy and speech.
//! * [`config`] — `settings.toml`.
//! * [`app`] — the egui window.

pub mod app;
pub mod config;
pub mod language;
pub mod output;
pub mod pipeline;
pub mod translate;
