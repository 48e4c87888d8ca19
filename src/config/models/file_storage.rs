//! File storage configuration

use super::*;
use serde::{Deserialize, Serialize};

/// File storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileStorageConfig {
    /// Storage type (`local` or `drive`)
    #[serde(default = "default_storage_type")]
    pub storage_type: String,
    /// Local storage directory
    #[serde(default = "default_local_path")]
    pub local_path: Option<String>,
    /// Remote drive configuration
    pub drive: Option<DriveConfig>,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            storage_type: default_storage_type(),
            local_path: default_local_path(),
            drive: None,
        }
    }
}

impl FileStorageConfig {
    /// Whether uploads go to the remote drive
    pub fn is_remote(&self) -> bool {
        self.storage_type == "drive"
    }
}

/// Remote drive configuration
///
/// The credential bundle is a service-account JSON document, read either from
/// `credentials_file` or from the environment variable named by
/// `credentials_env`. The file wins when both are present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveConfig {
    /// Destination folder id; every upload lands here
    #[serde(default)]
    pub folder_id: String,
    /// Path to the service-account JSON key
    pub credentials_file: Option<String>,
    /// Environment variable holding the service-account JSON key
    #[serde(default = "default_credentials_env")]
    pub credentials_env: String,
    /// Base URL of the Drive REST API (metadata and downloads)
    #[serde(default = "default_drive_api_base")]
    pub api_base: String,
    /// Base URL used for media uploads
    #[serde(default = "default_drive_api_base")]
    pub upload_base: String,
    /// OAuth2 token endpoint, used when the key does not carry its own
    #[serde(default = "default_drive_token_uri")]
    pub token_uri: String,
    /// OAuth2 scope requested for the service account
    #[serde(default = "default_drive_scope")]
    pub scope: String,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            folder_id: String::new(),
            credentials_file: None,
            credentials_env: default_credentials_env(),
            api_base: default_drive_api_base(),
            upload_base: default_drive_api_base(),
            token_uri: default_drive_token_uri(),
            scope: default_drive_scope(),
        }
    }
}
