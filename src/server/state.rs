//! Application state shared across HTTP handlers
//!
//! This module provides the AppState struct and its implementations.

use crate::config::Config;
use crate::storage::files::FileStore;
use crate::storage::log::LogAppender;
use crate::submission::{ProcessorSettings, SubmissionProcessor};
use std::sync::Arc;
use tokio::sync::Mutex;

/// HTTP server state shared across handlers
///
/// All fields are wrapped in Arc for efficient sharing across worker threads.
#[derive(Clone)]
pub struct AppState {
    /// Portal configuration (shared read-only)
    pub config: Arc<Config>,
    /// File storage backend
    pub files: Arc<dyn FileStore>,
    /// Submission log
    pub log: Arc<dyn LogAppender>,
    /// Batch processor
    pub processor: Arc<SubmissionProcessor>,
    /// Held for the duration of one batch
    pub batch_lock: Arc<Mutex<()>>,
}

impl AppState {
    /// Create a new AppState with shared resources
    pub fn new(config: Config, files: Arc<dyn FileStore>, log: Arc<dyn LogAppender>) -> Self {
        let settings = ProcessorSettings::from_config(&config);
        let processor = SubmissionProcessor::new(files.clone(), log.clone(), settings);

        Self {
            config: Arc::new(config),
            files,
            log,
            processor: Arc::new(processor),
            batch_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Get portal configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
