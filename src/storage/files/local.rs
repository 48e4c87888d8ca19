//! Local file system storage implementation

use crate::utils::error::{PortalError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use super::types::FileStore;

/// Local file storage
///
/// Files are written flat into the base directory under their derived name.
/// Storing the same name twice overwrites the earlier file.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new local storage instance
    pub async fn new(base_path: impl AsRef<Path>) -> Result<Self> {
        let path = base_path.as_ref().to_path_buf();

        // Create directory if it doesn't exist
        if !path.exists() {
            fs::create_dir_all(&path).await.map_err(|e| {
                PortalError::FileStorage(format!("Failed to create storage directory: {}", e))
            })?;
        }

        info!("Local file storage initialized at: {}", path.display());
        Ok(Self { base_path: path })
    }

    /// Directory files are written to
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Get file path for a given stored name
    fn get_file_path(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(PortalError::FileStorage(format!(
                "Invalid stored file name: {:?}",
                name
            )));
        }
        Ok(self.base_path.join(name))
    }
}

#[async_trait]
impl FileStore for LocalStorage {
    async fn store(&self, name: &str, _content_type: &str, content: &[u8]) -> Result<String> {
        let file_path = self.get_file_path(name)?;

        let mut file = fs::File::create(&file_path)
            .await
            .map_err(|e| PortalError::FileStorage(format!("Failed to create file: {}", e)))?;

        file.write_all(content)
            .await
            .map_err(|e| PortalError::FileStorage(format!("Failed to write file: {}", e)))?;
        file.flush()
            .await
            .map_err(|e| PortalError::FileStorage(format!("Failed to write file: {}", e)))?;

        debug!("File stored: {} ({} bytes)", file_path.display(), content.len());
        Ok(name.to_string())
    }

    async fn get(&self, id: &str) -> Result<Vec<u8>> {
        let file_path = self.get_file_path(id)?;

        if !file_path.exists() {
            return Err(PortalError::NotFound(format!("File not found: {}", id)));
        }

        fs::read(&file_path)
            .await
            .map_err(|e| PortalError::FileStorage(format!("Failed to read file: {}", e)))
    }

    async fn health_check(&self) -> Result<()> {
        // Check if base directory is accessible
        if !self.base_path.exists() {
            return Err(PortalError::FileStorage(
                "Storage directory does not exist".to_string(),
            ));
        }

        // Try to write a test file
        let test_file = self.base_path.join(".health_check");
        fs::write(&test_file, b"health_check")
            .await
            .map_err(|e| PortalError::FileStorage(format!("Storage not writable: {}", e)))?;

        // Clean up test file
        let _ = fs::remove_file(&test_file).await;

        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}

/// Detect content type from filename
pub fn detect_content_type(filename: &str) -> String {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("xlsx") => {
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_string()
        }
        Some("xls") => "application/vnd.ms-excel".to_string(),
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document".to_string()
        }
        Some("doc") => "application/msword".to_string(),
        Some("pdf") => "application/pdf".to_string(),
        Some("txt") => "text/plain".to_string(),
        Some("json") => "application/json".to_string(),
        Some("csv") => "text/csv".to_string(),
        Some("zip") => "application/zip".to_string(),
        _ => "application/octet-stream".to_string(),
    }
}
