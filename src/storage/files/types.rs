//! File storage types and enums

use super::{DriveStorage, LocalStorage};
use crate::utils::error::Result;
use async_trait::async_trait;

/// A place submitted files can be written to and read back from
#[async_trait]
pub trait FileStore: Send + Sync + std::fmt::Debug {
    /// Persist `content` under `name` and return the stored identifier
    async fn store(&self, name: &str, content_type: &str, content: &[u8]) -> Result<String>;

    /// Read back the content stored under `id`
    async fn get(&self, id: &str) -> Result<Vec<u8>>;

    /// Verify the backend is reachable and writable
    async fn health_check(&self) -> Result<()>;

    /// Short backend name for logs and health output
    fn backend_name(&self) -> &'static str;
}

/// File storage backend
#[derive(Debug, Clone)]
pub enum FileStorage {
    /// Local file system storage
    Local(LocalStorage),
    /// Google Drive folder storage
    Drive(DriveStorage),
}
