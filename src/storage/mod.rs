//! Storage layer for the portal
//!
//! This module holds the uploaded-file backends and the submission log.

/// File storage module
pub mod files;
/// Submission log module
pub mod log;

use crate::config::Config;
use crate::utils::error::Result;
use files::{FileStorage, FileStore};
use log::{LogAppender, XlsxSubmissionLog};
use std::sync::Arc;
use tracing::{debug, info};

/// Main storage layer that owns the file backend and the submission log
#[derive(Debug, Clone)]
pub struct StorageLayer {
    /// File storage backend
    pub files: Arc<FileStorage>,
    /// Submission log
    pub log: Arc<XlsxSubmissionLog>,
}

impl StorageLayer {
    /// Create a new storage layer
    pub async fn new(config: &Config) -> Result<Self> {
        info!("Initializing storage layer");

        debug!("Initializing file storage");
        let files = Arc::new(FileStorage::new(config.storage()).await?);

        let log = Arc::new(XlsxSubmissionLog::from_config(config.submission_log()));
        debug!("Submission log at {}", log.path().display());

        info!("Storage layer initialized successfully");
        Ok(Self { files, log })
    }

    /// File backend as a trait object
    pub fn file_store(&self) -> Arc<dyn FileStore> {
        self.files.clone()
    }

    /// Submission log as a trait object
    pub fn log_appender(&self) -> Arc<dyn LogAppender> {
        self.log.clone()
    }
}
