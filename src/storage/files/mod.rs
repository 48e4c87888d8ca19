//! File storage implementation
//!
//! Submitted files go either to a local directory or to a Google Drive
//! folder. Both implement [`FileStore`]; [`FileStorage`] picks one from
//! configuration.

mod drive;
mod local;
mod storage;
mod types;

// Re-export public types
pub use drive::{DriveCredentials, DriveStorage};
pub use local::{LocalStorage, detect_content_type};
pub use types::{FileStorage, FileStore};
