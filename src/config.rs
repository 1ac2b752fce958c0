use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::llm::{LLMConfig, LLMProvider};

/// Locations searched when no explicit config path is given
pub const CONFIG_PATHS: &[&str] = &["cms-ai.toml", "config/cms-ai.toml"];

/// Configuration for the content generation service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Provider selection and credentials
    pub ai: LLMConfig,

    /// Generation settings
    pub generation: GenerationConfig,

    /// HTTP surface settings
    pub server: ServerConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Fixed RNG seed for style/angle/adjective draws (unset = entropy)
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// Timeout for ordinary CRUD calls
    pub request_timeout_seconds: u64,

    /// Timeout for generation calls, longer than the CRUD one
    pub generation_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            request_timeout_seconds: 10,
            generation_timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or the first default location found,
    /// then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => Self::load_default_locations(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Parse a single TOML file without environment overrides
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        tracing::info!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    fn load_default_locations() -> Self {
        for path in CONFIG_PATHS {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str(&config_str) {
                    Ok(config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("No configuration file found, using defaults");
        Self::default()
    }

    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup` (the process environment in production)
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(provider) = lookup("AI_PROVIDER") {
            let provider = provider.parse::<LLMProvider>().unwrap_or_else(|e| {
                tracing::warn!("{}, falling back to mock", e);
                LLMProvider::Mock
            });
            self.set_provider(provider);
        }

        if let Some(env_key) = self.ai.provider.api_key_env() {
            if let Some(api_key) = lookup(env_key).filter(|key| !key.trim().is_empty()) {
                self.ai.api_key = Some(api_key);
            }
        }

        if let Some(model) = lookup("AI_MODEL") {
            self.ai.model = Some(model);
        }

        if let Some(endpoint) = lookup("AI_ENDPOINT") {
            self.ai.endpoint = Some(endpoint);
        }

        if let Some(seed) = lookup("CMS_AI_SEED") {
            match seed.parse() {
                Ok(seed) => self.generation.seed = Some(seed),
                Err(_) => tracing::warn!("Ignoring invalid CMS_AI_SEED: {}", seed),
            }
        }

        if let Some(port) = lookup("CMS_AI_PORT") {
            self.server.port = port.parse().unwrap_or(self.server.port);
        }

        if let Some(level) = lookup("CMS_AI_LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    /// Switch provider. A model pinned to the old provider's default follows the
    /// switch, and a credential belonging to the old provider is dropped.
    pub fn set_provider(&mut self, provider: LLMProvider) {
        if provider == self.ai.provider {
            return;
        }
        if self.ai.model.as_deref() == Some(self.ai.provider.default_model()) {
            self.ai.model = None;
        }
        if self.ai.provider.api_key_env().is_some() {
            self.ai.api_key = None;
        }
        self.ai.provider = provider;
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.ai.timeout_seconds == 0 {
            return Err(anyhow!("ai.timeout_seconds must be greater than 0"));
        }

        if self.server.request_timeout_seconds == 0 || self.server.generation_timeout_seconds == 0 {
            return Err(anyhow!("server timeouts must be greater than 0"));
        }

        if self.server.generation_timeout_seconds <= self.server.request_timeout_seconds {
            return Err(anyhow!(
                "generation_timeout_seconds ({}) must be longer than request_timeout_seconds ({})",
                self.server.generation_timeout_seconds,
                self.server.request_timeout_seconds
            ));
        }

        if !(0.0..=2.0).contains(&self.ai.temperature) {
            return Err(anyhow!("ai.temperature must be within 0.0..=2.0"));
        }

        if self.ai.provider != LLMProvider::Mock && self.ai.api_key.is_none() {
            tracing::warn!(
                "⚠️ No API key for {} (set {}), generation will fall back to mock",
                self.ai.provider,
                self.ai.provider.api_key_env().unwrap_or("api_key")
            );
        }

        tracing::info!("✅ Configuration validation passed");
        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "CMS Content AI Configuration:\n\
            - Provider: {}\n\
            - Model: {}\n\
            - API Key: {}\n\
            - Endpoint: {}\n\
            - Seed: {}\n\
            - Server: {}:{}\n\
            - Timeouts: request {}s, generation {}s\n\
            - Log Level: {}",
            self.ai.provider,
            self.ai.model(),
            if self.ai.api_key.is_some() { "set" } else { "not set" },
            self.ai.endpoint.as_deref().unwrap_or("default"),
            self.generation
                .seed
                .map(|seed| seed.to_string())
                .unwrap_or_else(|| "random".to_string()),
            self.server.host,
            self.server.port,
            self.server.request_timeout_seconds,
            self.server.generation_timeout_seconds,
            self.logging.level
        )
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_provider(mut self, provider: LLMProvider) -> Self {
        self.config.set_provider(provider);
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.ai.api_key = Some(api_key.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.ai.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.generation.seed = Some(seed);
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
