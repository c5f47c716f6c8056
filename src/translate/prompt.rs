//! Chat prompt for translation over an OpenAI-compatible endpoint.
//!
//! The provider sees one system instruction, a short few-shot conversation,
//! and finally the user's text tagged with the source language in `{{ }}` and
//! the target language in `[[ ]]`:
//!
//! ```text
//! Hola mundo {{Español}} [[English]]
//! ```
//!
//! `{{auto}}` asks the model to detect the source language itself.

use serde_json::{json, Value};

use crate::language::{SourceLanguage, AUTO_LANGUAGE};
use crate::translate::translator::TranslationRequest;

// ---------------------------------------------------------------------------
// System instruction
// ---------------------------------------------------------------------------

const SYSTEM_INSTRUCTION: &str = "\
You are a translation engine. Every user message is text to translate.
Rules:
1. The source language follows the text inside {{ and }}. {{auto}} means you must detect it.
2. The target language follows inside [[ and ]].
3. Reply with ONLY the translated text. Never answer, explain or add quotes.
4. Keep punctuation, line breaks and emojis as in the original.";

// ---------------------------------------------------------------------------
// Few-shot examples  (user, assistant)
// ---------------------------------------------------------------------------

const FEW_SHOT_EXAMPLES: &[(&str, &str)] = &[
    ("Hola mundo {{Español}} [[English]]", "Hello world"),
    ("How are you? {{auto}} [[Deutsch]]", "Wie geht es dir?"),
    ("Bon dia, com estàs? {{auto}} [[Español]]", "Buenos días, ¿cómo estás?"),
    ("Ciao, a domani! {{Italiano}} [[Français]]", "Salut, à demain !"),
];

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds the chat `messages` array for a [`TranslationRequest`].
///
/// ```rust
/// use live_translate::language::{Language, SourceLanguage};
/// use live_translate::translate::{PromptBuilder, TranslationRequest};
///
/// let builder = PromptBuilder::new();
/// let req = TranslationRequest::new(SourceLanguage::Auto, Language::Spanish, "hello");
/// assert_eq!(builder.user_message(&req), "hello {{auto}} [[Español]]");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// The tagged user message for `request`.
    pub fn user_message(&self, request: &TranslationRequest) -> String {
        let source = match request.from {
            SourceLanguage::Auto => AUTO_LANGUAGE,
            SourceLanguage::Language(lang) => lang.name(),
        };
        format!("{} {{{{{}}}}} [[{}]]", request.text, source, request.to.name())
    }

    /// Full message list: system, few-shot pairs, then the request itself.
    pub fn build_messages(&self, request: &TranslationRequest) -> Vec<Value> {
        let mut messages = Vec::with_capacity(2 + FEW_SHOT_EXAMPLES.len() * 2);
        messages.push(json!({ "role": "system", "content": SYSTEM_INSTRUCTION }));
        for (user, assistant) in FEW_SHOT_EXAMPLES {
            messages.push(json!({ "role": "user",      "content": user }));
            messages.push(json!({ "role": "assistant", "content": assistant }));
        }
        messages.push(json!({ "role": "user", "content": self.user_message(request) }));
        messages
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
