//! Configuration management for the portal
//!
//! This module handles loading, validation, and management of all portal configuration.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{PortalError, Result};
use std::path::Path;
use tracing::{debug, info, warn};

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "config/portal.yaml";

/// Main configuration struct for the portal
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Portal configuration
    pub portal: PortalConfig,
}

impl Config {
    /// Load configuration from file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Self::read_file(path.as_ref()).await?;
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config = Self::parse_yaml(content)?;
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    async fn read_file(path: &Path) -> Result<Self> {
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| PortalError::Config(format!("Failed to read config file: {}", e)))?;

        Self::parse_yaml(&content)
    }

    fn parse_yaml(content: &str) -> Result<Self> {
        let portal: PortalConfig = serde_yaml::from_str(content)
            .map_err(|e| PortalError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(Self { portal })
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            portal: PortalConfig::from_env(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Load the configuration file when it exists, otherwise fall back to the
    /// environment. `PORTAL_*` variables override file values either way.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(
                "Configuration file {} not found, using defaults and environment",
                path.display()
            );
            return Self::from_env();
        }

        // Validated only after the overrides, which may fill required fields
        let mut config = Self::read_file(path).await?;
        config.portal.apply_env_overrides();
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Get server configuration
    pub fn server(&self) -> &ServerConfig {
        &self.portal.server
    }

    /// Get file storage configuration
    pub fn storage(&self) -> &FileStorageConfig {
        &self.portal.storage
    }

    /// Get submission log configuration
    pub fn submission_log(&self) -> &SubmissionLogConfig {
        &self.portal.submission_log
    }

    /// Get logging configuration
    pub fn logging(&self) -> &LoggingConfig {
        &self.portal.logging
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.portal
            .server
            .validate()
            .map_err(|e| PortalError::Config(format!("Server config error: {}", e)))?;

        self.portal
            .storage
            .validate()
            .map_err(|e| PortalError::Config(format!("Storage config error: {}", e)))?;

        self.portal
            .submission_log
            .validate()
            .map_err(|e| PortalError::Config(format!("Submission log config error: {}", e)))?;

        self.portal
            .logging
            .validate()
            .map_err(|e| PortalError::Config(format!("Logging config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.portal)
            .map_err(|e| PortalError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
