//! Error types for the portal

use thiserror::Error;

/// Result type alias for the portal
pub type Result<T> = std::result::Result<T, PortalError>;

/// Main error type for the portal
#[derive(Error, Debug)]
pub enum PortalError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Submission validation errors (batch-fatal)
    #[error("Validation error: {0}")]
    Validation(String),

    /// File storage errors (local disk or remote drive)
    #[error("File storage error: {0}")]
    FileStorage(String),

    /// Submission log read/write errors
    #[error("Submission log error: {0}")]
    SubmissionLog(String),

    /// Authentication errors against the remote storage provider
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Network errors
    #[error("Network error: {0}")]
    Network(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request errors
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
