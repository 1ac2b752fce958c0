//! API module for the content generation service
//!
//! Exposes generation over HTTP for the CMS frontend. Persistence of the
//! returned record stays with the caller.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::generation::ContentGenerator;

pub mod handlers;
pub mod models;
pub mod server;

/// API Server for handling REST requests
pub struct ApiServer {
    generator: Arc<ContentGenerator>,
    config: Arc<Config>,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(generator: Arc<ContentGenerator>, config: Arc<Config>) -> Self {
        Self { generator, config }
    }

    /// Start the API server
    pub async fn start(self) -> Result<()> {
        info!(
            "🚀 Starting API server on port {} (provider: {})",
            self.config.server.port,
            self.generator.provider()
        );

        server::start_http_server(server::AppState {
            generator: self.generator,
            config: self.config,
        })
        .await
    }
}
