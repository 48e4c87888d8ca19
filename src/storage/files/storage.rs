//! FileStorage enum implementation with dispatch methods

use crate::config::FileStorageConfig;
use crate::utils::error::{PortalError, Result};
use async_trait::async_trait;
use tracing::info;

use super::drive::DriveStorage;
use super::local::LocalStorage;
use super::types::{FileStorage, FileStore};

impl FileStorage {
    /// Create a new file storage instance
    ///
    /// Drive storage authenticates here, so bad credentials fail start-up.
    pub async fn new(config: &FileStorageConfig) -> Result<Self> {
        info!("Initializing file storage: {}", config.storage_type);

        match config.storage_type.as_str() {
            "local" => {
                let path = config
                    .local_path
                    .as_ref()
                    .ok_or_else(|| PortalError::Config("Local path not specified".to_string()))?;
                Ok(FileStorage::Local(LocalStorage::new(path).await?))
            }
            "drive" => {
                let drive_config = config.drive.as_ref().ok_or_else(|| {
                    PortalError::Config("Drive configuration not specified".to_string())
                })?;
                Ok(FileStorage::Drive(DriveStorage::new(drive_config).await?))
            }
            _ => Err(PortalError::Config(format!(
                "Unsupported storage type: {}",
                config.storage_type
            ))),
        }
    }
}

#[async_trait]
impl FileStore for FileStorage {
    async fn store(&self, name: &str, content_type: &str, content: &[u8]) -> Result<String> {
        match self {
            FileStorage::Local(storage) => storage.store(name, content_type, content).await,
            FileStorage::Drive(storage) => storage.store(name, content_type, content).await,
        }
    }

    async fn get(&self, id: &str) -> Result<Vec<u8>> {
        match self {
            FileStorage::Local(storage) => storage.get(id).await,
            FileStorage::Drive(storage) => storage.get(id).await,
        }
    }

    async fn health_check(&self) -> Result<()> {
        match self {
            FileStorage::Local(storage) => storage.health_check().await,
            FileStorage::Drive(storage) => storage.health_check().await,
        }
    }

    fn backend_name(&self) -> &'static str {
        match self {
            FileStorage::Local(storage) => storage.backend_name(),
            FileStorage::Drive(storage) => storage.backend_name(),
        }
    }
}
