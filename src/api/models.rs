//! API data models

use serde::{Deserialize, Serialize};

use crate::generation::{GenerationError, GenerationWarning};

/// API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<GenerationWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            warning: None,
            error: None,
            code: None,
            suggestion: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            warning: None,
            error: Some(message),
            code: None,
            suggestion: None,
        }
    }

    pub fn with_warning(mut self, warning: Option<GenerationWarning>) -> Self {
        self.warning = warning;
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: Option<String>) -> Self {
        self.suggestion = suggestion;
        self
    }
}

impl ApiResponse<()> {
    pub fn from_generation_error(error: &GenerationError) -> Self {
        Self::error(error.to_string())
            .with_code(error.code())
            .with_suggestion(error.suggestion().map(str::to_string))
    }
}
