//! HTTP server implementation for the API

use anyhow::Result;
use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use super::{handlers, models::ApiResponse};
use crate::config::Config;
use crate::generation::ContentGenerator;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<ContentGenerator>,
    pub config: Arc<Config>,
}

/// Routes plus middleware, without binding a socket
pub fn router(app_state: AppState) -> Router {
    // Configure CORS to allow browser access
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        // Health check endpoints (both paths for compatibility)
        .route("/health", get(health_handler))
        .route("/api/health", get(health_handler))
        .route("/api/ai/generate", post(generate_handler))
        .with_state(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

/// Configure and start the HTTP server
pub async fn start_http_server(app_state: AppState) -> Result<()> {
    let address = format!("{}:{}", app_state.config.server.host, app_state.config.server.port);
    let app = router(app_state);

    // Bind and serve
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("🌐 API server listening on http://{}", address);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check handler
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(handlers::health_check(&state.generator)))
}

/// Content generation handler
pub async fn generate_handler(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let request = match handlers::parse_generate_request(body) {
        Ok(request) => request,
        Err(message) => {
            warn!("Rejected generation request: {}", message);
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<()>::error(message).with_code("VALIDATION_ERROR")),
            )
                .into_response();
        }
    };

    let timeout = Duration::from_secs(state.config.server.generation_timeout_seconds);
    match handlers::generate(&state.generator, &request, timeout).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(ApiResponse::success(outcome.content).with_warning(outcome.warning)),
        )
            .into_response(),
        Err(e) => {
            let (status, body) = handlers::error_response(&e);
            (status, Json(body)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{FakeLLM, LLMError};

    fn state(generator: ContentGenerator) -> AppState {
        AppState {
            generator: Arc::new(generator),
            config: Arc::new(Config::default()),
        }
    }

    #[tokio::test]
    async fn test_generate_handler_success() {
        let body = serde_json::json!({
            "title": "Curve Rush IO",
            "description": "Endless hills in multiplayer mode.",
            "options": ["autoSEO", "autoStructure"]
        });
        let response = generate_handler(State(state(ContentGenerator::mock())), Json(body)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_generate_handler_validation() {
        let body = serde_json::json!({"description": "no title"});
        let response = generate_handler(State(state(ContentGenerator::mock())), Json(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_generate_handler_fatal_errors() {
        let body = serde_json::json!({"title": "Escape Road", "description": "Drive fast."});

        let fake = FakeLLM::failing(LLMError::ResponseError("API_KEY_INVALID".to_string()));
        let response =
            generate_handler(State(state(ContentGenerator::with_llm(Arc::new(fake)))), Json(body.clone())).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let fake = FakeLLM::failing(LLMError::Api {
            provider: crate::llm::LLMProvider::Gemini,
            status: 403,
            message: "[PERMISSION_DENIED] Caller lacks access".to_string(),
            details: None,
        });
        let response =
            generate_handler(State(state(ContentGenerator::with_llm(Arc::new(fake)))), Json(body)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
