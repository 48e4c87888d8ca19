//! Submission log configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Submission log configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionLogConfig {
    /// Path of the summary workbook
    #[serde(default = "default_summary_file")]
    pub path: String,
    /// Upload a dated copy of the whole log through the file storage after
    /// each batch. Defaults to on for remote storage.
    pub snapshot_after_batch: Option<bool>,
}

impl Default for SubmissionLogConfig {
    fn default() -> Self {
        Self {
            path: default_summary_file(),
            snapshot_after_batch: None,
        }
    }
}

impl SubmissionLogConfig {
    /// Resolve the snapshot flag against the configured storage
    pub fn snapshot_enabled(&self, storage: &FileStorageConfig) -> bool {
        self.snapshot_after_batch.unwrap_or_else(|| storage.is_remote())
    }
}
