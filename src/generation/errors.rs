//! Provider failure classification.
//!
//! Classes are checked in a fixed order: network, quota, credential, permission,
//! then the catch-all. Credential and permission failures are fatal; everything
//! else degrades to locally synthesized content.

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::error::Error as StdError;
use std::sync::OnceLock;

use super::types::GenerationWarning;
use crate::llm::LLMError;

const NETWORK_MARKERS: &[&str] = &[
    "connection refused",
    "econnrefused",
    "enotfound",
    "timed out",
    "timeout",
    "dns",
    "network",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorClass {
    NetworkError,
    QuotaExceeded,
    InvalidApiKey,
    PermissionDenied,
    AiServiceError,
}

impl ErrorClass {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorClass::NetworkError => "NETWORK_ERROR",
            ErrorClass::QuotaExceeded => "QUOTA_EXCEEDED",
            ErrorClass::InvalidApiKey => "INVALID_API_KEY",
            ErrorClass::PermissionDenied => "PERMISSION_DENIED",
            ErrorClass::AiServiceError => "AI_SERVICE_ERROR",
        }
    }

    /// Fatal classes cannot be fixed by retrying or by falling back
    pub fn is_fatal(&self) -> bool {
        matches!(self, ErrorClass::InvalidApiKey | ErrorClass::PermissionDenied)
    }

    fn suggestion(&self) -> Option<&'static str> {
        match self {
            ErrorClass::NetworkError => Some("Check network connectivity to the AI provider"),
            ErrorClass::QuotaExceeded => {
                Some("Retry after the indicated delay or raise the provider quota")
            }
            ErrorClass::InvalidApiKey => Some(
                "Check the configured API key (GOOGLE_API_KEY or OPENAI_API_KEY) and restart the service",
            ),
            ErrorClass::PermissionDenied => {
                Some("Check that the API key is allowed to use the configured model")
            }
            ErrorClass::AiServiceError => None,
        }
    }

    fn degraded_summary(&self) -> &'static str {
        match self {
            ErrorClass::NetworkError => "AI service unreachable",
            ErrorClass::QuotaExceeded => "AI quota exceeded",
            _ => "AI service error",
        }
    }
}

/// Fatal generation failure surfaced to the caller
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("Invalid AI API key: {message}")]
    InvalidApiKey { message: String, suggestion: String },

    #[error("AI API permission denied: {message}")]
    PermissionDenied { message: String, suggestion: String },

    #[error("AI service error: {0}")]
    AiService(String),
}

impl GenerationError {
    pub fn code(&self) -> &'static str {
        match self {
            GenerationError::InvalidApiKey { .. } => ErrorClass::InvalidApiKey.code(),
            GenerationError::PermissionDenied { .. } => ErrorClass::PermissionDenied.code(),
            GenerationError::AiService(_) => ErrorClass::AiServiceError.code(),
        }
    }

    pub fn suggestion(&self) -> Option<&str> {
        match self {
            GenerationError::InvalidApiKey { suggestion, .. }
            | GenerationError::PermissionDenied { suggestion, .. } => Some(suggestion),
            GenerationError::AiService(_) => None,
        }
    }
}

/// A classified failure with its diagnostic metadata
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedError {
    pub class: ErrorClass,
    pub message: String,
    pub retry_delay: Option<String>,
    /// Quota violation list, when the vendor sent one
    pub details: Option<Value>,
    pub suggestion: Option<String>,
}

impl ClassifiedError {
    pub fn new(class: ErrorClass, message: impl Into<String>) -> Self {
        Self {
            class,
            message: message.into(),
            retry_delay: None,
            details: None,
            suggestion: class.suggestion().map(str::to_string),
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.class.is_fatal()
    }

    pub fn to_warning(&self) -> GenerationWarning {
        GenerationWarning {
            code: self.class.code().to_string(),
            message: format!(
                "{}, returned fallback content: {}",
                self.class.degraded_summary(),
                self.message
            ),
            retry_delay: self.retry_delay.clone(),
            details: self.details.clone(),
            suggestion: self.suggestion.clone(),
        }
    }

    pub fn into_error(self) -> GenerationError {
        let suggestion = self.suggestion.unwrap_or_default();
        match self.class {
            ErrorClass::InvalidApiKey => GenerationError::InvalidApiKey {
                message: self.message,
                suggestion,
            },
            ErrorClass::PermissionDenied => GenerationError::PermissionDenied {
                message: self.message,
                suggestion,
            },
            _ => GenerationError::AiService(self.message),
        }
    }
}

/// Maps a provider failure onto the error taxonomy
pub trait ErrorClassifier: Send + Sync {
    fn classify(&self, error: &LLMError) -> ClassifiedError;
}

/// Substring heuristics over the error chain and HTTP status.
///
/// Vendor SDK errors are mostly unstructured, so this matches on message text.
/// Swap in another [`ErrorClassifier`] once a provider exposes structured codes.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageHeuristicClassifier;

impl MessageHeuristicClassifier {
    pub fn new() -> Self {
        Self
    }

    fn is_network(error: &LLMError, lower: &str) -> bool {
        if let LLMError::Http(e) = error {
            if e.is_connect() || e.is_timeout() {
                return true;
            }
        }
        NETWORK_MARKERS.iter().any(|marker| lower.contains(marker))
    }

    fn is_quota(status: Option<u16>, text: &str, lower: &str) -> bool {
        status == Some(429)
            || lower.contains("quota")
            || lower.contains("rate limit")
            || text.contains("RESOURCE_EXHAUSTED")
    }

    fn is_invalid_key(text: &str, lower: &str) -> bool {
        lower.contains("api key") || text.contains("API_KEY")
    }

    fn is_permission_denied(status: Option<u16>, text: &str, lower: &str) -> bool {
        status == Some(403) || lower.contains("permission denied") || text.contains("PERMISSION_DENIED")
    }
}

impl ErrorClassifier for MessageHeuristicClassifier {
    fn classify(&self, error: &LLMError) -> ClassifiedError {
        let text = error_chain_text(error);
        let lower = text.to_lowercase();
        let status = http_status(error);

        if Self::is_network(error, &lower) {
            return ClassifiedError::new(ErrorClass::NetworkError, text);
        }

        if Self::is_quota(status, &text, &lower) {
            let vendor_details = match error {
                LLMError::Api { details, .. } => details.as_ref(),
                _ => None,
            };
            let mut classified = ClassifiedError::new(ErrorClass::QuotaExceeded, text.clone());
            classified.retry_delay = vendor_details
                .and_then(retry_delay_from_details)
                .or_else(|| retry_delay_from_message(&text));
            classified.details = vendor_details.and_then(quota_violations);
            return classified;
        }

        if Self::is_invalid_key(&text, &lower) {
            return ClassifiedError::new(ErrorClass::InvalidApiKey, text);
        }

        if Self::is_permission_denied(status, &text, &lower) {
            return ClassifiedError::new(ErrorClass::PermissionDenied, text);
        }

        ClassifiedError::new(ErrorClass::AiServiceError, text)
    }
}

/// Display text of the error and every source below it
fn error_chain_text(error: &LLMError) -> String {
    let mut parts = vec![error.to_string()];
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !parts.iter().any(|part| part.contains(&text)) {
            parts.push(text);
        }
        source = cause.source();
    }
    parts.join(": ")
}

fn http_status(error: &LLMError) -> Option<u16> {
    match error {
        LLMError::Api { status, .. } => Some(*status),
        LLMError::Http(e) => e.status().map(|s| s.as_u16()),
        _ => None,
    }
}

/// `retryDelay` from a Gemini `RetryInfo` detail entry
fn retry_delay_from_details(details: &Value) -> Option<String> {
    let entries: Vec<&Value> = match details {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };
    entries
        .into_iter()
        .find_map(|entry| entry.get("retryDelay"))
        .and_then(|delay| match delay {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(format!("{}s", n)),
            _ => None,
        })
}

fn retry_delay_from_message(text: &str) -> Option<String> {
    static RETRY_IN: OnceLock<Option<Regex>> = OnceLock::new();
    RETRY_IN
        .get_or_init(|| Regex::new(r"(?i)retry in ([0-9]+(?:\.[0-9]+)?)\s*s").ok())
        .as_ref()?
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| format!("{}s", m.as_str()))
}

/// `violations` from a Gemini `QuotaFailure` detail entry
fn quota_violations(details: &Value) -> Option<Value> {
    let entries: Vec<&Value> = match details {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };
    entries
        .into_iter()
        .find_map(|entry| entry.get("violations"))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LLMProvider;
    use serde_json::json;

    fn api_error(status: u16, message: &str, details: Option<Value>) -> LLMError {
        LLMError::Api {
            provider: LLMProvider::Gemini,
            status,
            message: message.to_string(),
            details,
        }
    }

    fn classify(error: &LLMError) -> ClassifiedError {
        MessageHeuristicClassifier::new().classify(error)
    }

    #[test]
    fn test_quota_with_retry_info() {
        let details = json!([
            {
                "@type": "type.googleapis.com/google.rpc.QuotaFailure",
                "violations": [{"quotaMetric": "generativelanguage.googleapis.com/generate_content_free_tier_requests"}]
            },
            {"@type": "type.googleapis.com/google.rpc.RetryInfo", "retryDelay": "37s"}
        ]);
        let classified = classify(&api_error(429, "[RESOURCE_EXHAUSTED] Quota exceeded", Some(details)));

        assert_eq!(classified.class, ErrorClass::QuotaExceeded);
        assert!(!classified.is_fatal());
        assert_eq!(classified.retry_delay.as_deref(), Some("37s"));
        assert!(classified.details.as_ref().unwrap().is_array());

        let warning = classified.to_warning();
        assert_eq!(warning.code, "QUOTA_EXCEEDED");
        assert_eq!(warning.retry_delay.as_deref(), Some("37s"));
    }

    #[test]
    fn test_quota_delay_from_message() {
        let classified = classify(&api_error(429, "Rate limit reached. Please retry in 2.5s.", None));
        assert_eq!(classified.class, ErrorClass::QuotaExceeded);
        assert_eq!(classified.retry_delay.as_deref(), Some("2.5s"));
    }

    #[test]
    fn test_invalid_key_is_fatal() {
        let classified = classify(&api_error(
            400,
            "[INVALID_ARGUMENT] API key not valid. Please pass a valid API key.",
            None,
        ));
        assert_eq!(classified.class, ErrorClass::InvalidApiKey);
        assert!(classified.is_fatal());

        let error = classified.into_error();
        assert_eq!(error.code(), "INVALID_API_KEY");
        assert!(error.suggestion().unwrap().contains("API key"));

        let missing = classify(&LLMError::Configuration(
            "Gemini API key required (set GOOGLE_API_KEY)".to_string(),
        ));
        assert_eq!(missing.class, ErrorClass::InvalidApiKey);
    }

    #[test]
    fn test_permission_denied() {
        let classified = classify(&api_error(403, "[PERMISSION_DENIED] Caller lacks access", None));
        assert_eq!(classified.class, ErrorClass::PermissionDenied);
        assert_eq!(classified.into_error().code(), "PERMISSION_DENIED");
    }

    #[test]
    fn test_network_markers_win_over_later_classes() {
        let classified = classify(&LLMError::ResponseError("connect ECONNREFUSED 127.0.0.1:443".to_string()));
        assert_eq!(classified.class, ErrorClass::NetworkError);
        assert_eq!(classified.to_warning().code, "NETWORK_ERROR");

        // network precedes quota
        let classified = classify(&api_error(429, "request timed out", None));
        assert_eq!(classified.class, ErrorClass::NetworkError);
    }

    #[test]
    fn test_unclassified_falls_through() {
        let classified = classify(&api_error(500, "[INTERNAL] An internal error has occurred", None));
        assert_eq!(classified.class, ErrorClass::AiServiceError);
        assert!(!classified.is_fatal());
        assert!(classified.suggestion.is_none());
        assert_eq!(
            classified.into_error(),
            GenerationError::AiService("Gemini API error 500: [INTERNAL] An internal error has occurred".to_string())
        );
    }
}
