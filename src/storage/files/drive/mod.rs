//! Google Drive folder storage
//!
//! Every store uploads a new object into the configured folder. Objects are
//! addressed by their derived name; reads resolve the newest object carrying
//! that name.

mod auth;

pub use auth::{DriveAuth, DriveCredentials};

use crate::config::DriveConfig;
use crate::utils::error::{PortalError, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::types::FileStore;

/// Drive folder storage
#[derive(Debug, Clone)]
pub struct DriveStorage {
    folder_id: String,
    api_base: String,
    upload_base: String,
    auth: DriveAuth,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

impl DriveStorage {
    /// Load credentials and authenticate once
    pub async fn new(config: &DriveConfig) -> Result<Self> {
        let credentials = match &config.credentials_file {
            Some(path) => DriveCredentials::from_file(path).await?,
            None => {
                let json = std::env::var(&config.credentials_env).map_err(|_| {
                    PortalError::Config(format!(
                        "Drive credentials not found: set storage.drive.credentials_file or {}",
                        config.credentials_env
                    ))
                })?;
                DriveCredentials::parse(&json)?
            }
        };

        let storage = Self::with_credentials(config, credentials)?;
        storage.auth.get_access_token().await?;

        info!("Drive storage initialized for folder {}", storage.folder_id);
        Ok(storage)
    }

    /// Build without contacting the token endpoint
    pub fn with_credentials(config: &DriveConfig, credentials: DriveCredentials) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| PortalError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        let auth = DriveAuth::new(
            credentials,
            config.token_uri.clone(),
            config.scope.clone(),
            client.clone(),
        );

        Ok(Self {
            folder_id: config.folder_id.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            upload_base: config.upload_base.trim_end_matches('/').to_string(),
            auth,
            client,
        })
    }

    /// Destination folder id
    pub fn folder_id(&self) -> &str {
        &self.folder_id
    }

    /// Upload `content` as a new object and return its Drive id
    pub async fn upload(&self, name: &str, content_type: &str, content: &[u8]) -> Result<String> {
        let token = self.auth.get_access_token().await?;
        let boundary = format!(
            "portal_boundary_{}",
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        );
        let metadata = serde_json::json!({
            "name": name,
            "parents": [self.folder_id],
            "mimeType": content_type,
        });
        let body = multipart_related_body(&boundary, &metadata, content_type, content)?;

        let response = self
            .client
            .post(format!("{}/upload/drive/v3/files", self.upload_base))
            .query(&[
                ("uploadType", "multipart"),
                ("supportsAllDrives", "true"),
                ("fields", "id,name"),
            ])
            .bearer_auth(token)
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={}", boundary),
            )
            .body(body)
            .send()
            .await
            .map_err(|e| request_failed("upload", e))?;

        let file: DriveFile = Self::check(response, "upload").await?.json().await?;
        debug!("Uploaded {} as Drive object {}", file.name, file.id);
        Ok(file.id)
    }

    /// Id of the newest object named `name` in the folder
    pub async fn find(&self, name: &str) -> Result<Option<String>> {
        let token = self.auth.get_access_token().await?;
        let query = format!(
            "name = '{}' and '{}' in parents and trashed = false",
            escape_query(name),
            escape_query(&self.folder_id)
        );

        let response = self
            .client
            .get(format!("{}/drive/v3/files", self.api_base))
            .query(&[
                ("q", query.as_str()),
                ("orderBy", "createdTime desc"),
                ("pageSize", "1"),
                ("fields", "files(id,name)"),
                ("supportsAllDrives", "true"),
                ("includeItemsFromAllDrives", "true"),
            ])
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| request_failed("lookup", e))?;

        let list: FileList = Self::check(response, "lookup").await?.json().await?;
        Ok(list.files.into_iter().next().map(|file| file.id))
    }

    /// Download an object by Drive id
    pub async fn download(&self, file_id: &str) -> Result<Vec<u8>> {
        let token = self.auth.get_access_token().await?;
        let response = self
            .client
            .get(format!("{}/drive/v3/files/{}", self.api_base, file_id))
            .query(&[("alt", "media"), ("supportsAllDrives", "true")])
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| request_failed("download", e))?;

        let bytes = Self::check(response, "download").await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    async fn check(response: reqwest::Response, action: &str) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 | 403 => Err(PortalError::Auth(format!(
                "Drive {} rejected ({}): {}",
                action, status, body
            ))),
            404 => Err(PortalError::NotFound(format!(
                "Drive {} found nothing: {}",
                action, body
            ))),
            _ => Err(PortalError::FileStorage(format!(
                "Drive {} failed ({}): {}",
                action, status, body
            ))),
        }
    }
}

#[async_trait]
impl FileStore for DriveStorage {
    async fn store(&self, name: &str, content_type: &str, content: &[u8]) -> Result<String> {
        self.upload(name, content_type, content).await?;
        Ok(name.to_string())
    }

    async fn get(&self, id: &str) -> Result<Vec<u8>> {
        let file_id = self
            .find(id)
            .await?
            .ok_or_else(|| PortalError::NotFound(format!("File not found: {}", id)))?;
        self.download(&file_id).await
    }

    async fn health_check(&self) -> Result<()> {
        let token = self.auth.get_access_token().await?;
        let response = self
            .client
            .get(format!("{}/drive/v3/files/{}", self.api_base, self.folder_id))
            .query(&[("fields", "id"), ("supportsAllDrives", "true")])
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| request_failed("folder check", e))?;
        Self::check(response, "folder check").await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "drive"
    }
}

/// Body of a `multipart/related` upload: JSON metadata then the media
fn multipart_related_body(
    boundary: &str,
    metadata: &serde_json::Value,
    content_type: &str,
    content: &[u8],
) -> Result<Vec<u8>> {
    let metadata = serde_json::to_vec(metadata)?;
    let mut body = Vec::with_capacity(content.len() + metadata.len() + 256);

    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
    body.extend_from_slice(&metadata);
    body.extend_from_slice(format!("\r\n--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    Ok(body)
}

/// A request that never got a response from Drive
fn request_failed(action: &str, e: reqwest::Error) -> PortalError {
    PortalError::network(format!("Drive {} request failed: {}", action, e))
}

/// Escape a literal for a Drive `q` expression
fn escape_query(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}
