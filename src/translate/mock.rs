//! [`MockTranslator`] — a scripted test double for the [`Translator`] trait.
//!
//! Replies are keyed by source text.  Each reply can be delayed so tests can
//! force out-of-order completions under a paused tokio clock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::translator::{TranslateError, TranslationRequest, Translator};

#[derive(Debug, Clone)]
enum Reply {
    Ok(String),
    Fail,
}

/// Scripted translator.  Unscripted texts echo back as `"<to>:<text>"`.
#[derive(Default)]
pub struct MockTranslator {
    replies: HashMap<String, (Duration, Reply)>,
    calls: Arc<Mutex<Vec<TranslationRequest>>>,
}

impl MockTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `text` with `translated` after `delay`.
    pub fn reply(mut self, text: &str, translated: &str, delay: Duration) -> Self {
        self.replies
            .insert(text.to_string(), (delay, Reply::Ok(translated.to_string())));
        self
    }

    /// Fail `text` after `delay`.
    pub fn fail(mut self, text: &str, delay: Duration) -> Self {
        self.replies.insert(text.to_string(), (delay, Reply::Fail));
        self
    }

    /// Shared handle to the list of received requests, in call order.
    pub fn calls(&self) -> Arc<Mutex<Vec<TranslationRequest>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, TranslateError> {
        self.calls.lock().unwrap().push(request.clone());

        let (delay, reply) = self
            .replies
            .get(&request.text)
            .cloned()
            .unwrap_or_else(|| {
                (
                    Duration::ZERO,
                    Reply::Ok(format!("{}:{}", request.to.code(), request.text)),
                )
            });

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match reply {
            Reply::Ok(text) => Ok(text),
            Reply::Fail => Err(TranslateError::Request("mock failure".into())),
        }
    }
}
