//! Language catalog — supported languages, the `auto` sentinel and the
//! language → voice-locale mapping used by speech synthesis.
//!
//! Two types keep the target slot free of the sentinel at compile time:
//!
//! * [`Language`] — a concrete, supported language.  Used for the target.
//! * [`SourceLanguage`] — either [`SourceLanguage::Auto`] or a concrete
//!   [`Language`].  Used for the source.
//!
//! Both serialise as their short code (`"en"`, `"auto"`, …) so they can live
//! in `settings.toml` unchanged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Code of the auto-detect pseudo-language.
pub const AUTO_LANGUAGE: &str = "auto";

// ---------------------------------------------------------------------------
// LanguageError
// ---------------------------------------------------------------------------

/// Errors produced when parsing a language code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LanguageError {
    /// The code is not in the supported set.
    #[error("unsupported language code: {0:?}")]
    Unsupported(String),

    /// `auto` was supplied where a concrete language is required.
    #[error("\"auto\" cannot be used as a target language")]
    AutoAsTarget,
}

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// A concrete, supported language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Language {
    English,
    Spanish,
    German,
    Italian,
    French,
    Portuguese,
}

impl Language {
    /// Every supported language, in selector order.
    pub const ALL: [Language; 6] = [
        Language::English,
        Language::Spanish,
        Language::German,
        Language::Italian,
        Language::French,
        Language::Portuguese,
    ];

    /// ISO-639-1 code.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
            Language::German => "de",
            Language::Italian => "it",
            Language::French => "fr",
            Language::Portuguese => "pt",
        }
    }

    /// Display name in the language itself, as shown in the selectors.
    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Español",
            Language::German => "Deutsch",
            Language::Italian => "Italiano",
            Language::French => "Français",
            Language::Portuguese => "Português",
        }
    }

    /// BCP-47 locale handed to the speech synthesiser.
    ///
    /// ```
    /// use live_translate::language::Language;
    ///
    /// assert_eq!(Language::Spanish.voice_locale(), "es-ES");
    /// assert_eq!(Language::English.voice_locale(), "en-US");
    /// ```
    pub fn voice_locale(self) -> &'static str {
        match self {
            Language::English => "en-US",
            Language::Spanish => "es-ES",
            Language::German => "de-DE",
            Language::Italian => "it-IT",
            Language::French => "fr-FR",
            Language::Portuguese => "pt-PT",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = LanguageError;

    /// Parse a language code (case-insensitive).
    ///
    /// ```
    /// use live_translate::language::{Language, LanguageError};
    ///
    /// assert_eq!("es".parse::<Language>(), Ok(Language::Spanish));
    /// assert_eq!("auto".parse::<Language>(), Err(LanguageError::AutoAsTarget));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        if code == AUTO_LANGUAGE {
            return Err(LanguageError::AutoAsTarget);
        }
        Language::ALL
            .into_iter()
            .find(|lang| lang.code() == code)
            .ok_or_else(|| LanguageError::Unsupported(s.to_string()))
    }
}

impl TryFrom<String> for Language {
    type Error = LanguageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Language> for String {
    fn from(lang: Language) -> Self {
        lang.code().to_string()
    }
}

// ---------------------------------------------------------------------------
// SourceLanguage
// ---------------------------------------------------------------------------

/// Source-side language selection: auto-detect or a concrete language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SourceLanguage {
    /// Let the provider detect the source language.
    #[default]
    Auto,
    /// A concrete source language.
    Language(Language),
}

impl SourceLanguage {
    /// The concrete language, or `None` for [`SourceLanguage::Auto`].
    pub fn concrete(self) -> Option<Language> {
        match self {
            SourceLanguage::Auto => None,
            SourceLanguage::Language(lang) => Some(lang),
        }
    }

    pub fn is_auto(self) -> bool {
        matches!(self, SourceLanguage::Auto)
    }

    pub fn code(self) -> &'static str {
        match self {
            SourceLanguage::Auto => AUTO_LANGUAGE,
            SourceLanguage::Language(lang) => lang.code(),
        }
    }

    /// Label for the source selector.
    pub fn name(self) -> &'static str {
        match self {
            SourceLanguage::Auto => "Detect language",
            SourceLanguage::Language(lang) => lang.name(),
        }
    }
}

impl From<Language> for SourceLanguage {
    fn from(lang: Language) -> Self {
        SourceLanguage::Language(lang)
    }
}

impl fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SourceLanguage {
    type Err = LanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(AUTO_LANGUAGE) {
            return Ok(SourceLanguage::Auto);
        }
        s.parse::<Language>().map(SourceLanguage::Language)
    }
}

impl TryFrom<String> for SourceLanguage {
    type Error = LanguageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SourceLanguage> for String {
    fn from(lang: SourceLanguage) -> Self {
        lang.code().to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
