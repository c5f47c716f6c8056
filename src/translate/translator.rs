//! Core `Translator` trait and `ApiTranslator` implementation.
//!
//! `ApiTranslator` calls any OpenAI-compatible `/v1/chat/completions`
//! endpoint.  All connection details come from [`TranslatorConfig`]; nothing
//! is hardcoded.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::TranslatorConfig;
use crate::language::{Language, SourceLanguage};
use crate::translate::prompt::PromptBuilder;

// ---------------------------------------------------------------------------
// TranslationRequest
// ---------------------------------------------------------------------------

/// The `(from, to, text)` tuple captured when a translation is triggered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub from: SourceLanguage,
    pub to: Language,
    pub text: String,
}

impl TranslationRequest {
    pub fn new(from: SourceLanguage, to: Language, text: impl Into<String>) -> Self {
        Self {
            from,
            to,
            text: text.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// TranslateError
// ---------------------------------------------------------------------------

/// Errors that can occur during a translation lookup.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("translation request timed out")]
    Timeout,

    /// The provider answered with a non-success HTTP status.
    #[error("provider returned HTTP {0}")]
    Status(u16),

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse provider response: {0}")]
    Parse(String),

    /// The provider requires an API key and none is configured.
    #[error("no API key configured (set translator.api_key or OPENAI_API_KEY)")]
    MissingApiKey,
}

impl From<reqwest::Error> for TranslateError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TranslateError::Timeout
        } else if let Some(status) = e.status() {
            TranslateError::Status(status.as_u16())
        } else {
            TranslateError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Translator trait
// ---------------------------------------------------------------------------

/// Async translation lookup.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// (e.g. wrapped in `Arc<dyn Translator>`), and must tolerate overlapping
/// calls.
///
/// An `Ok` with an empty string means "nothing to show"; callers leave their
/// current output in place.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, TranslateError>;
}

// ---------------------------------------------------------------------------
// ApiTranslator
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/v1/chat/completions` endpoint.
pub struct ApiTranslator {
    client: reqwest::Client,
    config: TranslatorConfig,
    api_key: Option<String>,
    prompt_builder: PromptBuilder,
}

impl ApiTranslator {
    /// Build an `ApiTranslator` from application config.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs`.  The API key is resolved once, here.
    pub fn from_config(config: &TranslatorConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
            api_key: config.resolved_api_key(),
            prompt_builder: PromptBuilder::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl Translator for ApiTranslator {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, TranslateError> {
        if self.api_key.is_none() && self.config.provider.requires_api_key() {
            return Err(TranslateError::MissingApiKey);
        }

        let body = serde_json::json!({
            "model":       self.config.model,
            "messages":    self.prompt_builder.build_messages(request),
            "stream":      false,
            "temperature": self.config.temperature,
        });

        let mut req = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = self.api_key.as_deref() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?.error_for_status()?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranslateError::Parse(e.to_string()))?;

        if json.get("choices").is_none() {
            return Err(TranslateError::Parse("response has no `choices`".into()));
        }

        // `content` may legitimately be null; that is "no translation yet".
        let translated = json["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .trim()
            .to_string();

        log::debug!(
            "translator: {} -> {} ({} chars in, {} chars out)",
            request.from,
            request.to,
            request.text.len(),
            translated.len()
        );

        Ok(translated)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TranslatorProvider;

    fn make_config(provider: TranslatorProvider, api_key: Option<&str>) -> TranslatorConfig {
        TranslatorConfig {
            provider,
            base_url: "http://localhost:11434/".into(),
            api_key: api_key.map(|s| s.to_string()),
            model: "qwen2.5:3b".into(),
            temperature: 0.2,
            timeout_secs: 5,
        }
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let translator = ApiTranslator::from_config(&make_config(
            TranslatorProvider::OpenAiCompatible,
            None,
        ));
        assert_eq!(
            translator.endpoint(),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[test]
    fn configured_key_is_resolved() {
        let translator =
            ApiTranslator::from_config(&make_config(TranslatorProvider::OpenAi, Some("sk-1")));
        assert_eq!(translator.api_key.as_deref(), Some("sk-1"));
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let mut translator =
            ApiTranslator::from_config(&make_config(TranslatorProvider::OpenAi, None));
        // Independent of whatever OPENAI_API_KEY the test environment has.
        translator.api_key = None;

        let request = TranslationRequest::new(SourceLanguage::Auto, Language::Spanish, "hello");
        let err = translator.translate(&request).await.unwrap_err();
        assert!(matches!(err, TranslateError::MissingApiKey));
    }

    #[test]
    fn translator_is_object_safe() {
        let translator: Box<dyn Translator> = Box::new(ApiTranslator::from_config(
            &make_config(TranslatorProvider::OpenAiCompatible, None),
        ));
        drop(translator);
    }

    #[test]
    fn request_new_captures_tuple() {
        let req = TranslationRequest::new(Language::German.into(), Language::English, "Hallo");
        assert_eq!(req.from, SourceLanguage::Language(Language::German));
        assert_eq!(req.to, Language::English);
        assert_eq!(req.text, "Hallo");
    }
}
