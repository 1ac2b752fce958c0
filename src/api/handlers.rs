//! API request handlers

use axum::http::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

use super::models::ApiResponse;
use crate::generation::{ContentGenerator, ContentRequest, GenerationError, GenerationOutcome};

/// Handle health check requests
pub fn health_check(generator: &ContentGenerator) -> Value {
    serde_json::json!({
        "status": "healthy",
        "service": "cms-content-ai",
        "version": env!("CARGO_PKG_VERSION"),
        "provider": generator.provider(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    })
}

/// Check the raw body and turn it into a request.
///
/// Title and description are both required; everything else is optional.
pub fn parse_generate_request(body: Value) -> Result<ContentRequest, String> {
    let has_text = |field: &str| {
        body.get(field)
            .and_then(Value::as_str)
            .map_or(false, |text| !text.trim().is_empty())
    };
    if !has_text("title") || !has_text("description") {
        return Err("title and description are required".to_string());
    }

    serde_json::from_value(body).map_err(|e| format!("invalid request body: {}", e))
}

/// Run one generation under the caller-owned timeout
pub async fn generate(
    generator: &ContentGenerator,
    request: &ContentRequest,
    timeout: Duration,
) -> Result<GenerationOutcome, GenerationError> {
    match tokio::time::timeout(timeout, generator.generate_content(request)).await {
        Ok(result) => result,
        Err(_) => {
            warn!("⏱️ Generation for '{}' timed out after {:?}", request.title, timeout);
            Err(GenerationError::AiService(format!(
                "generation timed out after {}s",
                timeout.as_secs()
            )))
        }
    }
}

/// HTTP status for a fatal generation error
pub fn error_status(error: &GenerationError) -> StatusCode {
    match error {
        GenerationError::InvalidApiKey { .. } => StatusCode::BAD_REQUEST,
        GenerationError::PermissionDenied { .. } => StatusCode::FORBIDDEN,
        GenerationError::AiService(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn error_response(error: &GenerationError) -> (StatusCode, ApiResponse<()>) {
    (error_status(error), ApiResponse::from_generation_error(error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::GenerationOptions;
    use crate::llm::{FakeLLM, LLMError};
    use std::sync::Arc;

    #[test]
    fn test_request_validation() {
        assert!(parse_generate_request(serde_json::json!({"title": "Escape Road"})).is_err());
        assert!(parse_generate_request(serde_json::json!({"title": " ", "description": "x"})).is_err());

        let request = parse_generate_request(serde_json::json!({
            "title": "Escape Road",
            "description": "Drive fast.",
            "options": {"autoSEO": true}
        }))
        .unwrap();
        assert_eq!(request.options, GenerationOptions::new().with(crate::generation::OptionFlag::AutoSeo));
    }

    #[test]
    fn test_error_mapping() {
        let key = GenerationError::InvalidApiKey {
            message: "API key not valid".to_string(),
            suggestion: "Check the configured API key".to_string(),
        };
        let (status, body) = error_response(&key);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code.as_deref(), Some("INVALID_API_KEY"));
        assert!(body.suggestion.is_some());

        let denied = GenerationError::PermissionDenied {
            message: "denied".to_string(),
            suggestion: "scopes".to_string(),
        };
        assert_eq!(error_status(&denied), StatusCode::FORBIDDEN);
        assert_eq!(
            error_status(&GenerationError::AiService("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_generate_degrades_on_quota() {
        let fake = FakeLLM::failing(LLMError::Api {
            provider: crate::llm::LLMProvider::Gemini,
            status: 429,
            message: "[RESOURCE_EXHAUSTED] Quota exceeded".to_string(),
            details: None,
        });
        let generator = ContentGenerator::with_llm(Arc::new(fake));
        let request = ContentRequest::new("Escape Road", "Drive fast.");

        let outcome = generate(&generator, &request, Duration::from_secs(5)).await.unwrap();
        assert_eq!(outcome.warning.unwrap().code, "QUOTA_EXCEEDED");
    }
}
