//! Server builder and run_server function
//!
//! This module provides the ServerBuilder for easier server configuration
//! and the run_server function for starting from a configuration file.

use crate::config::Config;
use crate::server::server::HttpServer;
use crate::utils::error::{PortalError, Result};
use std::path::Path;
use tracing::info;

/// Server builder for easier configuration
pub struct ServerBuilder {
    config: Option<Config>,
}

impl ServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self { config: None }
    }

    /// Set configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the HTTP server
    pub async fn build(self) -> Result<HttpServer> {
        let config = self
            .config
            .ok_or_else(|| PortalError::Config("Configuration is required".to_string()))?;

        HttpServer::new(&config).await
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Load the configuration at `config_path` and serve until shutdown
pub async fn run_server(config_path: impl AsRef<Path>) -> Result<()> {
    let config = Config::load(config_path).await?;
    run_with_config(config).await
}

/// Serve with an already loaded configuration
pub async fn run_with_config(config: Config) -> Result<()> {
    info!("Starting programme upload portal");

    let server = ServerBuilder::new().with_config(config).build().await?;
    let server_config = server.config();
    let storage = server.state().config.storage();
    info!(
        "Server starting at: http://{}:{}",
        server_config.host, server_config.port
    );
    info!(
        "File storage: {} | submission log: {}",
        storage.storage_type,
        server.state().config.submission_log().path
    );
    info!("API Endpoints:");
    info!("   GET  /health - Health check");
    info!("   POST /api/submissions - Submit a department batch");
    info!("   GET  /api/submissions/log - Download the submission log");

    server.start().await
}
