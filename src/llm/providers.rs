use super::{ChatMessage, LLMConfig, LLMError, LLMProvider, LLMResponse, Result, LLM};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const GEMINI_DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const OPENAI_DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

/// Vendor error envelope shared by Gemini and OpenAI: `{"error": {...}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
    details: Option<serde_json::Value>,
}

/// Turn a non-success response body into a structured API error
fn api_error(provider: LLMProvider, status: StatusCode, body: &str) -> LLMError {
    let (message, details) = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => {
            let message = envelope.error.message.unwrap_or_else(|| body.to_string());
            let message = match envelope.error.status {
                Some(vendor_status) => format!("[{}] {}", vendor_status, message),
                None => message,
            };
            (message, envelope.error.details)
        }
        Err(_) => (body.trim().to_string(), None),
    };

    LLMError::Api {
        provider,
        status: status.as_u16(),
        message,
        details,
    }
}

fn build_client(config: &LLMConfig) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .build()?)
}

/// Gemini provider implementation
pub struct GeminiProvider {
    config: LLMConfig,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Debug, Deserialize)]
struct GeminiUsage {
    #[serde(rename = "totalTokenCount")]
    total_token_count: u32,
}

impl GeminiProvider {
    pub fn new(config: LLMConfig) -> Result<Self> {
        if config.api_key.as_deref().map_or(true, str::is_empty) {
            return Err(LLMError::Configuration(
                "Gemini API key required (set GOOGLE_API_KEY)".to_string(),
            ));
        }

        let client = build_client(&config)?;
        Ok(Self { config, client })
    }

    fn endpoint(&self) -> &str {
        self.config
            .endpoint
            .as_deref()
            .unwrap_or(GEMINI_DEFAULT_ENDPOINT)
            .trim_end_matches('/')
    }
}

#[async_trait]
impl LLM for GeminiProvider {
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<LLMResponse> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| LLMError::Configuration("Gemini API key not configured".to_string()))?;

        // Gemini takes a single user turn here; fold everything into it
        let text = messages
            .into_iter()
            .map(|msg| msg.content)
            .collect::<Vec<_>>()
            .join("\n\n");

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart { text }],
            }],
            generation_config: GeminiGenerationConfig {
                max_output_tokens: self.config.max_tokens,
                temperature: self.config.temperature,
            },
        };

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint(),
            self.config.model(),
            api_key
        );

        debug!("Sending request to Gemini API (model: {})", self.config.model());

        // the key travels in the query string; keep it out of error messages
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| LLMError::Http(e.without_url()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(api_error(LLMProvider::Gemini, status, &text));
        }

        let gemini_response: GeminiResponse = response.json().await?;

        let content = gemini_response
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<String>()
            })
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| LLMError::ResponseError("No response from Gemini".to_string()))?;

        let tokens_used = gemini_response.usage_metadata.map(|u| u.total_token_count);

        Ok(LLMResponse {
            content,
            tokens_used,
        })
    }

    async fn is_available(&self) -> bool {
        let Some(api_key) = &self.config.api_key else {
            return false;
        };

        let url = format!("{}/models?key={}", self.endpoint(), api_key);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn provider_type(&self) -> LLMProvider {
        LLMProvider::Gemini
    }
}

/// OpenAI provider implementation
pub struct OpenAIProvider {
    config: LLMConfig,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    total_tokens: u32,
}

impl OpenAIProvider {
    pub fn new(config: LLMConfig) -> Result<Self> {
        if config.api_key.as_deref().map_or(true, str::is_empty) {
            return Err(LLMError::Configuration(
                "OpenAI API key required (set OPENAI_API_KEY)".to_string(),
            ));
        }

        let client = build_client(&config)?;
        Ok(Self { config, client })
    }

    fn endpoint(&self) -> &str {
        self.config
            .endpoint
            .as_deref()
            .unwrap_or(OPENAI_DEFAULT_ENDPOINT)
            .trim_end_matches('/')
    }
}

#[async_trait]
impl LLM for OpenAIProvider {
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<LLMResponse> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| LLMError::Configuration("OpenAI API key not configured".to_string()))?;

        let request = OpenAIRequest {
            model: self.config.model().to_string(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let url = format!("{}/chat/completions", self.endpoint());

        debug!("Sending request to OpenAI API (model: {})", self.config.model());

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(api_error(LLMProvider::OpenAI, status, &text));
        }

        let openai_response: OpenAIResponse = response.json().await?;

        let content = openai_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| LLMError::ResponseError("No response from OpenAI".to_string()))?;

        let tokens_used = openai_response.usage.map(|u| u.total_tokens);

        Ok(LLMResponse {
            content,
            tokens_used,
        })
    }

    async fn is_available(&self) -> bool {
        let Some(api_key) = &self.config.api_key else {
            return false;
        };

        let url = format!("{}/models", self.endpoint());
        match self.client.get(&url).bearer_auth(api_key).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn provider_type(&self) -> LLMProvider {
        LLMProvider::OpenAI
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_lifts_gemini_envelope() {
        let body = r#"{"error": {"code": 429, "message": "Quota exceeded for metric", "status": "RESOURCE_EXHAUSTED",
            "details": [{"@type": "type.googleapis.com/google.rpc.RetryInfo", "retryDelay": "37s"}]}}"#;

        match api_error(LLMProvider::Gemini, StatusCode::TOO_MANY_REQUESTS, body) {
            LLMError::Api { status, message, details, .. } => {
                assert_eq!(status, 429);
                assert_eq!(message, "[RESOURCE_EXHAUSTED] Quota exceeded for metric");
                assert!(details.unwrap().is_array());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_api_error_keeps_plain_body() {
        match api_error(LLMProvider::OpenAI, StatusCode::BAD_GATEWAY, "upstream down\n") {
            LLMError::Api { message, details, .. } => {
                assert_eq!(message, "upstream down");
                assert!(details.is_none());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_providers_reject_empty_key() {
        let config = LLMConfig::for_provider(LLMProvider::Gemini).with_api_key("");
        assert!(GeminiProvider::new(config).is_err());
    }
}
