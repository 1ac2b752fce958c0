//! CMS Content AI - Rust Implementation
//!
//! Turns a short title/description into a complete content record (SEO fields,
//! slug, long-form HTML) through an external text-generation provider, degrading
//! to deterministic local synthesis when the provider is unavailable.

pub mod config;
pub mod generation;
pub mod llm;

#[cfg(feature = "api")]
pub mod api;

// Re-export main types for easy access
pub use crate::config::{Config, ConfigBuilder};
pub use crate::generation::{
    CategoryInfo, ContentGenerator, ContentRequest, GeneratedContent, GenerationError,
    GenerationOptions, GenerationOutcome, GenerationWarning, OptionFlag,
};
pub use crate::llm::{LLMConfig, LLMProvider};
