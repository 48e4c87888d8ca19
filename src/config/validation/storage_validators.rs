//! Storage configuration validators
//!
//! This module provides validation implementations for the uploaded-file storage,
//! the remote drive and the submission log.

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::debug;
use url::Url;

impl Validate for FileStorageConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating file storage configuration");

        match self.storage_type.as_str() {
            "local" => match self.local_path.as_deref() {
                Some(path) if !path.trim().is_empty() => Ok(()),
                _ => Err("Local storage path cannot be empty".to_string()),
            },
            "drive" => self
                .drive
                .as_ref()
                .ok_or_else(|| "Drive configuration not specified".to_string())?
                .validate(),
            other => Err(format!(
                "Unsupported storage type: {}. Supported types: [\"local\", \"drive\"]",
                other
            )),
        }
    }
}

impl Validate for DriveConfig {
    fn validate(&self) -> Result<(), String> {
        if self.folder_id.trim().is_empty() {
            return Err("Drive folder id cannot be empty".to_string());
        }

        if self.credentials_file.is_none() && self.credentials_env.trim().is_empty() {
            return Err(
                "Drive credentials require either credentials_file or credentials_env"
                    .to_string(),
            );
        }

        validate_http_url(&self.api_base, "Drive api_base")?;
        validate_http_url(&self.upload_base, "Drive upload_base")?;
        validate_http_url(&self.token_uri, "Drive token_uri")?;

        Ok(())
    }
}

impl Validate for SubmissionLogConfig {
    fn validate(&self) -> Result<(), String> {
        if self.path.trim().is_empty() {
            return Err("Submission log path cannot be empty".to_string());
        }

        let is_xlsx = std::path::Path::new(&self.path)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"));
        if !is_xlsx {
            return Err(format!(
                "Submission log must be an .xlsx workbook: {}",
                self.path
            ));
        }

        Ok(())
    }
}

fn validate_http_url(value: &str, context: &str) -> Result<(), String> {
    let url = Url::parse(value).map_err(|e| format!("{} has invalid URL format: {}", context, e))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(format!(
            "{} must use http:// or https:// scheme, got: {}",
            context, scheme
        )),
    }
}
