//! Submission log storage
//!
//! The log is an xlsx workbook that is read in full, extended by one row and
//! written back in full on every append. Appends hold no lock of their own;
//! callers serialize batches.

mod workbook;


pub use workbook::{LogSheet, SHEET_NAME};

use crate::config::SubmissionLogConfig;
use crate::submission::LogRow;
use crate::utils::error::{PortalError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Durable, append-only record of logged programmes
#[async_trait]
pub trait LogAppender: Send + Sync + std::fmt::Debug {
    /// Append one row, creating the log with its header row when absent
    async fn append(&self, row: &LogRow) -> Result<()>;

    /// All rows in the order they were appended
    async fn rows(&self) -> Result<Vec<LogRow>>;

    /// Current encoded log, or `None` when nothing has been logged yet
    async fn snapshot(&self) -> Result<Option<Vec<u8>>>;
}

/// Submission log kept in an xlsx file on local disk
#[derive(Debug, Clone)]
pub struct XlsxSubmissionLog {
    path: PathBuf,
}

impl XlsxSubmissionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &SubmissionLogConfig) -> Self {
        Self::new(&config.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn blocking<T, F>(&self, task: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(PathBuf) -> Result<T> + Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || task(path))
            .await
            .map_err(|e| PortalError::Internal(format!("Submission log task failed: {}", e)))?
    }
}

#[async_trait]
impl LogAppender for XlsxSubmissionLog {
    async fn append(&self, row: &LogRow) -> Result<()> {
        let row = row.clone();
        let total = self
            .blocking(move |path| {
                let mut sheet = if path.exists() {
                    LogSheet::load(&path)?
                } else {
                    LogSheet::new()
                };
                sheet.push(&row);
                sheet.save(&path)?;
                Ok(sheet.len())
            })
            .await?;

        debug!("Submission log {} now holds {} rows", self.path.display(), total);
        Ok(())
    }

    async fn rows(&self) -> Result<Vec<LogRow>> {
        self.blocking(|path| {
            if !path.exists() {
                return Ok(Vec::new());
            }
            Ok(LogSheet::load(&path)?.log_rows())
        })
        .await
    }

    async fn snapshot(&self) -> Result<Option<Vec<u8>>> {
        self.blocking(|path| {
            if !path.exists() {
                return Ok(None);
            }
            std::fs::read(&path).map(Some).map_err(|e| {
                PortalError::SubmissionLog(format!("Failed to read {}: {}", path.display(), e))
            })
        })
        .await
    }
}
