//! Main portal configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Main portal configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PortalConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Uploaded file storage configuration
    #[serde(default)]
    pub storage: FileStorageConfig,
    /// Submission log configuration
    #[serde(default)]
    pub submission_log: SubmissionLogConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PortalConfig {
    /// Build a configuration from `PORTAL_*` environment variables on top of defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// Override individual settings from `PORTAL_*` environment variables
    pub fn apply_env_overrides(&mut self) {
        if let Some(host) = env_var("PORTAL_HOST") {
            self.server.host = host;
        }
        if let Some(port) = env_var("PORTAL_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(storage_type) = env_var("PORTAL_STORAGE_TYPE") {
            self.storage.storage_type = storage_type;
        }
        if let Some(path) = env_var("PORTAL_UPLOAD_DIR") {
            self.storage.local_path = Some(path);
        }
        if let Some(folder_id) = env_var("PORTAL_DRIVE_FOLDER_ID") {
            self.storage
                .drive
                .get_or_insert_with(DriveConfig::default)
                .folder_id = folder_id;
        }
        if let Some(path) = env_var("PORTAL_SUMMARY_FILE") {
            self.submission_log.path = path;
        }
        if let Some(level) = env_var("PORTAL_LOG_LEVEL") {
            self.logging.level = level;
        }
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
