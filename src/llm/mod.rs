pub mod fake;
pub mod providers;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use fake::FakeLLM;
pub use providers::{GeminiProvider, OpenAIProvider};

/// Result type for provider calls
pub type Result<T> = std::result::Result<T, LLMError>;

/// Error types for provider calls
#[derive(thiserror::Error, Debug)]
pub enum LLMError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-success status from the provider, with the vendor error envelope lifted out
    #[error("{provider:?} API error {status}: {message}")]
    Api {
        provider: LLMProvider,
        status: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("LLM response error: {0}")]
    ResponseError(String),
}

/// Provider selector
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LLMProvider {
    /// Deterministic local synthesis, no network
    #[default]
    Mock,
    Gemini,
    OpenAI,
}

impl LLMProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            LLMProvider::Mock => "mock",
            LLMProvider::Gemini => "gemini",
            LLMProvider::OpenAI => "openai",
        }
    }

    /// Model used when the configuration does not name one
    pub fn default_model(&self) -> &'static str {
        match self {
            LLMProvider::Mock => "mock",
            LLMProvider::Gemini => "gemini-pro",
            LLMProvider::OpenAI => "gpt-4o-mini",
        }
    }

    /// Environment variable holding this provider's credential
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            LLMProvider::Mock => None,
            LLMProvider::Gemini => Some("GOOGLE_API_KEY"),
            LLMProvider::OpenAI => Some("OPENAI_API_KEY"),
        }
    }
}

impl fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LLMProvider {
    type Err = LLMError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" | "" => Ok(LLMProvider::Mock),
            "gemini" => Ok(LLMProvider::Gemini),
            "openai" => Ok(LLMProvider::OpenAI),
            other => Err(LLMError::Configuration(format!("unknown AI provider '{}'", other))),
        }
    }
}

/// LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LLMConfig {
    pub provider: LLMProvider,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    /// Explicit model; unset follows the provider's default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::Mock,
            endpoint: None,
            api_key: None,
            model: None,
            max_tokens: 4096,
            temperature: 0.7,
            timeout_seconds: 60,
        }
    }
}

impl LLMConfig {
    /// Config for a provider with its default model
    pub fn for_provider(provider: LLMProvider) -> Self {
        Self {
            provider,
            ..Self::default()
        }
    }

    /// Model sent to the provider
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .map(str::trim)
            .filter(|model| !model.is_empty())
            .unwrap_or_else(|| self.provider.default_model())
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }
}

/// Chat message for LLM communication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// LLM response
#[derive(Debug, Clone)]
pub struct LLMResponse {
    pub content: String,
    pub tokens_used: Option<u32>,
}

/// Trait for LLM providers
#[async_trait]
pub trait LLM: Send + Sync {
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<LLMResponse>;
    async fn is_available(&self) -> bool;
    fn provider_type(&self) -> LLMProvider;
}

/// Create an LLM instance for a network-backed provider.
///
/// `Mock` has no network adapter; callers route it to local synthesis instead.
pub fn create_llm(config: &LLMConfig) -> Result<Box<dyn LLM>> {
    match config.provider {
        LLMProvider::Gemini => Ok(Box::new(GeminiProvider::new(config.clone())?)),
        LLMProvider::OpenAI => Ok(Box::new(OpenAIProvider::new(config.clone())?)),
        LLMProvider::Mock => Err(LLMError::Configuration(
            "mock provider has no network adapter".to_string(),
        )),
    }
}
