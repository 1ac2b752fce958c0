//! Scripted LLM provider for tests.
//!
//! Responses (or errors) are queued up front and handed out one per `chat` call,
//! so orchestration paths can be exercised without network access.

use super::{ChatMessage, LLMError, LLMProvider, LLMResponse, Result, LLM};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

/// A fake provider that replays queued outcomes.
///
/// Once the queue is drained, the default response is returned; without one the
/// call fails with a `ResponseError`.
#[derive(Debug, Default)]
pub struct FakeLLM {
    queue: Mutex<VecDeque<Result<String>>>,
    default_response: Option<String>,
    prompts: Mutex<Vec<String>>,
    provider: LLMProvider,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl FakeLLM {
    pub fn new() -> Self {
        Self {
            provider: LLMProvider::Gemini,
            ..Self::default()
        }
    }

    /// Fake that always answers with `text`
    pub fn responding(text: impl Into<String>) -> Self {
        Self::new().with_default_response(text)
    }

    /// Fake whose first call fails with `error`
    pub fn failing(error: LLMError) -> Self {
        Self::new().then_fail(error)
    }

    pub fn with_default_response(mut self, text: impl Into<String>) -> Self {
        self.default_response = Some(text.into());
        self
    }

    /// Report a different provider type
    pub fn as_provider(mut self, provider: LLMProvider) -> Self {
        self.provider = provider;
        self
    }

    pub fn then_respond(self, text: impl Into<String>) -> Self {
        lock(&self.queue).push_back(Ok(text.into()));
        self
    }

    pub fn then_fail(self, error: LLMError) -> Self {
        lock(&self.queue).push_back(Err(error));
        self
    }

    /// Prompts received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.prompts).len()
    }
}

#[async_trait]
impl LLM for FakeLLM {
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<LLMResponse> {
        let prompt = messages
            .into_iter()
            .map(|m| m.content)
            .collect::<Vec<_>>()
            .join("\n\n");
        lock(&self.prompts).push(prompt);

        let next = lock(&self.queue).pop_front();
        let content = match next {
            Some(outcome) => outcome?,
            None => self
                .default_response
                .clone()
                .ok_or_else(|| LLMError::ResponseError("fake provider has no response queued".to_string()))?,
        };

        Ok(LLMResponse {
            content,
            tokens_used: None,
        })
    }

    async fn is_available(&self) -> bool {
        true
    }

    fn provider_type(&self) -> LLMProvider {
        self.provider
    }
}
