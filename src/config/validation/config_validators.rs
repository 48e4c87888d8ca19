//! Core configuration validators
//!
//! This module provides validation implementations for the main portal configuration
//! structures including PortalConfig, ServerConfig and LoggingConfig.

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::{debug, warn};

impl Validate for PortalConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating portal configuration");

        self.server.validate()?;
        self.storage.validate()?;
        self.submission_log.validate()?;
        self.logging.validate()?;

        debug!("Portal configuration validation completed");
        Ok(())
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating server configuration");

        if self.host.is_empty() {
            return Err("Server host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        if let Some(workers) = self.workers {
            if workers == 0 {
                return Err("Worker count must be greater than 0".to_string());
            }
            if workers > 1000 {
                return Err("Worker count seems too high (>1000)".to_string());
            }
        }

        if self.timeout == 0 {
            return Err("Server timeout must be greater than 0".to_string());
        }

        if self.timeout > 3600 {
            return Err("Server timeout should not exceed 1 hour".to_string());
        }

        if self.max_body_size == 0 {
            return Err("Max body size must be greater than 0".to_string());
        }

        self.cors.validate()?;

        Ok(())
    }
}

impl Validate for CorsConfig {
    fn validate(&self) -> Result<(), String> {
        if self.enabled && self.allows_all_origins() {
            warn!("CORS allows all origins. This may be insecure for production.");
        }
        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let supported = ["trace", "debug", "info", "warn", "error"];
        if !supported.contains(&self.level.to_lowercase().as_str()) {
            return Err(format!(
                "Unsupported log level: {}. Supported levels: {:?}",
                self.level, supported
            ));
        }
        Ok(())
    }
}
