//! Tracing subscriber set-up
//!
//! `RUST_LOG` wins over the configured level when it is set.

use crate::config::{LogFormat, LoggingConfig};
use crate::utils::error::{PortalError, Result};
use tracing_subscriber::EnvFilter;

/// Build the level filter for `config`
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(&config.level).map_err(|e| {
        PortalError::Config(format!("Invalid log level {:?}: {}", config.level, e))
    })
}

/// Install the global subscriber
///
/// Fails if a subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = env_filter(config)?;

    let installed = match config.format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(false)
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .try_init(),
    };

    installed.map_err(|e| PortalError::Internal(format!("Failed to initialize logging: {}", e)))
}
