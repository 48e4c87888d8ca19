//! Configuration data models
//!
//! This module defines all configuration structures used throughout the portal.

#![allow(missing_docs)]

pub mod file_storage;
pub mod logging;
pub mod portal;
pub mod server;
pub mod submission_log;

// Re-export all configuration types
pub use file_storage::*;
pub use logging::*;
pub use portal::*;
pub use server::*;
pub use submission_log::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8501
}

/// Default timeout in seconds
pub fn default_timeout() -> u64 {
    120
}

/// Default maximum body size in bytes
pub fn default_max_body_size() -> usize {
    200 * 1024 * 1024 // 200MB, sixteen documents per batch
}

pub fn default_storage_type() -> String {
    "local".to_string()
}

pub fn default_upload_dir() -> String {
    "uploaded_files".to_string()
}

pub fn default_local_path() -> Option<String> {
    Some(default_upload_dir())
}

pub fn default_summary_file() -> String {
    "submissions_summary.xlsx".to_string()
}

pub fn default_drive_api_base() -> String {
    "https://www.googleapis.com".to_string()
}

pub fn default_drive_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

pub fn default_drive_scope() -> String {
    "https://www.googleapis.com/auth/drive".to_string()
}

pub fn default_credentials_env() -> String {
    "PORTAL_DRIVE_CREDENTIALS".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_true() -> bool {
    true
}
