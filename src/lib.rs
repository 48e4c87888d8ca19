//! # Programme Portal
//!
//! An upload portal that collects programme documents for a department.
//!
//! A submission batch names one department and up to four programmes. Each
//! programme must supply a spreadsheet plus one document per academic year
//! (2022-2023, 2023-2024, 2024-2025). Complete programmes have their files
//! stored under derived names and gain one row in an xlsx submission log.
//! Incomplete programmes are skipped with a warning.
//!
//! ## Features
//!
//! - **Two storage backends**: a local directory or a Google Drive folder
//! - **Spreadsheet log**: one row per programme, rewritten in place
//! - **Best-effort batches**: completed work is never rolled back
//! - **HTTP API**: multipart submission endpoint plus log download
//!
//! ## Running the portal
//!
//! ```rust,no_run
//! use programme_portal::{Config, Portal};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/portal.yaml").await?;
//!     let portal = Portal::new(config).await?;
//!     portal.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Processing a batch directly
//!
//! ```rust,no_run
//! use programme_portal::storage::files::LocalStorage;
//! use programme_portal::storage::log::XlsxSubmissionLog;
//! use programme_portal::submission::{
//!     AcademicYear, ProcessorSettings, SubmissionBatch, SubmissionProcessor, UploadedFile,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let files = LocalStorage::new("uploads").await?;
//!     let log = XlsxSubmissionLog::new("uploads/submissions_summary.xlsx");
//!     let processor = SubmissionProcessor::new(
//!         Arc::new(files),
//!         Arc::new(log),
//!         ProcessorSettings::default(),
//!     );
//!
//!     let mut batch = SubmissionBatch::new("Engineering");
//!     if let Some(programme) = batch.programme_mut(1) {
//!         programme.name = "Computer Science".to_string();
//!         programme.spreadsheet = Some(UploadedFile::new("plan.xlsx", std::fs::read("plan.xlsx")?));
//!         for year in AcademicYear::ALL {
//!             programme.set_document(year, UploadedFile::new("report.pdf", std::fs::read("report.pdf")?));
//!         }
//!     }
//!
//!     let report = processor.process(&batch).await?;
//!     println!("{} programme(s) logged", report.rows.len());
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod server;
pub mod storage;
pub mod submission;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use storage::files::{FileStorage, FileStore};
pub use storage::log::{LogAppender, XlsxSubmissionLog};
pub use submission::{BatchReport, BatchState, SubmissionBatch, SubmissionProcessor};
pub use utils::error::{PortalError, Result};

use tracing::info;

/// The portal service: configuration plus a ready HTTP server
pub struct Portal {
    config: Config,
    server: server::server::HttpServer,
}

impl Portal {
    /// Create a new portal instance, connecting the configured storage
    pub async fn new(config: Config) -> Result<Self> {
        info!("Creating new portal instance");

        let server = server::server::HttpServer::new(&config).await?;

        Ok(Self { config, server })
    }

    /// Configuration the portal was created with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the portal until shutdown
    pub async fn run(self) -> Result<()> {
        let build = build_info();
        info!(
            "Starting {} {} ({}, built with {})",
            NAME, build.version, build.git_hash, build.rust_version
        );
        info!(
            "Storage backend: {} | submission log: {}",
            self.config.storage().storage_type,
            self.config.submission_log().path
        );

        self.server.start().await
    }
}

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Portal build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build timestamp in seconds since the epoch
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: option_env!("BUILD_TIME").unwrap_or("unknown"),
            git_hash: option_env!("GIT_HASH").unwrap_or("unknown"),
            rust_version: option_env!("RUST_VERSION").unwrap_or("unknown"),
        }
    }
}

/// Build
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
