//! Google Drive authentication
//!
//! Supports:
//! - Service Account JSON (JWT bearer grant)
//! - Authorized User credentials (refresh token grant)
//! - Access Token

use crate::utils::error::{PortalError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Drive credential bundle
#[derive(Debug, Clone)]
pub enum DriveCredentials {
    /// Service Account JSON key
    ServiceAccount(ServiceAccountKey),

    /// Authorized User (from gcloud auth)
    AuthorizedUser(AuthorizedUserCredentials),

    /// Direct access token
    AccessToken(String),
}

/// Service Account key structure
#[derive(Clone, Deserialize, Serialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type")]
    pub key_type: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub private_key_id: Option<String>,
    pub private_key: String,
    pub client_email: String,
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .finish_non_exhaustive()
    }
}

/// Authorized User credentials (from gcloud)
#[derive(Clone, Deserialize, Serialize)]
pub struct AuthorizedUserCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    #[serde(rename = "type")]
    pub cred_type: String,
}

impl std::fmt::Debug for AuthorizedUserCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizedUserCredentials")
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl DriveCredentials {
    /// Parse credentials from JSON string
    pub fn parse(json_str: &str) -> Result<Self> {
        let json_obj: serde_json::Value = serde_json::from_str(json_str)
            .map_err(|e| PortalError::Auth(format!("Invalid credential bundle: {}", e)))?;

        match json_obj.get("type").and_then(|t| t.as_str()) {
            Some("service_account") => {
                let key: ServiceAccountKey = serde_json::from_value(json_obj).map_err(|e| {
                    PortalError::Auth(format!("Invalid service account key: {}", e))
                })?;
                Ok(DriveCredentials::ServiceAccount(key))
            }
            Some("authorized_user") => {
                let creds: AuthorizedUserCredentials =
                    serde_json::from_value(json_obj).map_err(|e| {
                        PortalError::Auth(format!("Invalid authorized user credentials: {}", e))
                    })?;
                Ok(DriveCredentials::AuthorizedUser(creds))
            }
            other => Err(PortalError::Auth(format!(
                "Unknown credential type: {}",
                other.unwrap_or("<missing>")
            ))),
        }
    }

    /// Load credentials from a JSON file
    pub async fn from_file(path: &str) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            PortalError::Config(format!("Failed to read credentials file {}: {}", path, e))
        })?;
        Self::parse(&contents)
    }
}

/// OAuth2 Token with expiration
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub token_type: String,
}

impl AccessToken {
    /// Check if token is expired
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at - Duration::minutes(5) // 5 min buffer
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
    #[serde(default = "default_token_type")]
    token_type: String,
}

fn default_expires_in() -> i64 {
    3600
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl From<TokenResponse> for AccessToken {
    fn from(response: TokenResponse) -> Self {
        AccessToken {
            token: response.access_token,
            expires_at: Utc::now() + Duration::seconds(response.expires_in),
            token_type: response.token_type,
        }
    }
}

/// Drive authentication handler with a cached token
#[derive(Debug, Clone)]
pub struct DriveAuth {
    credentials: DriveCredentials,
    token_uri: String,
    scope: String,
    token_cache: Arc<RwLock<Option<AccessToken>>>,
    http_client: reqwest::Client,
}

impl DriveAuth {
    /// Create new authentication handler
    ///
    /// `token_uri` is used unless a service-account key names its own.
    pub fn new(
        credentials: DriveCredentials,
        token_uri: impl Into<String>,
        scope: impl Into<String>,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            credentials,
            token_uri: token_uri.into(),
            scope: scope.into(),
            token_cache: Arc::new(RwLock::new(None)),
            http_client,
        }
    }

    /// Get a valid access token
    pub async fn get_access_token(&self) -> Result<String> {
        // Check cache first
        {
            let cache = self.token_cache.read().await;
            if let Some(token) = cache.as_ref().filter(|token| !token.is_expired()) {
                return Ok(token.token.clone());
            }
        }

        // Fetch new token based on credential type
        let new_token = match &self.credentials {
            DriveCredentials::ServiceAccount(key) => self.get_service_account_token(key).await?,
            DriveCredentials::AuthorizedUser(creds) => {
                self.get_authorized_user_token(creds).await?
            }
            DriveCredentials::AccessToken(token) => AccessToken {
                token: token.clone(),
                expires_at: Utc::now() + Duration::hours(1),
                token_type: "Bearer".to_string(),
            },
        };

        debug!("Obtained Drive access token, expires at {}", new_token.expires_at);

        // Update cache
        let token_string = new_token.token.clone();
        {
            let mut cache = self.token_cache.write().await;
            *cache = Some(new_token);
        }

        Ok(token_string)
    }

    /// Get token for service account
    async fn get_service_account_token(&self, key: &ServiceAccountKey) -> Result<AccessToken> {
        use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

        #[derive(Debug, Serialize)]
        struct Claims<'a> {
            iss: &'a str,
            scope: &'a str,
            aud: &'a str,
            exp: i64,
            iat: i64,
        }

        let token_uri = key.token_uri.as_deref().unwrap_or(&self.token_uri);

        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: &key.client_email,
            scope: &self.scope,
            aud: token_uri,
            exp: now + 3600,
            iat: now,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = key.private_key_id.clone();
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| PortalError::Auth(format!("Invalid service account private key: {}", e)))?;
        let jwt = encode(&header, &claims, &encoding_key)
            .map_err(|e| PortalError::Auth(format!("Failed to sign token request: {}", e)))?;

        // Exchange JWT for access token
        let params = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", jwt.as_str()),
        ];

        self.request_token(token_uri, &params).await
    }

    /// Get token for authorized user
    async fn get_authorized_user_token(
        &self,
        creds: &AuthorizedUserCredentials,
    ) -> Result<AccessToken> {
        let params = [
            ("client_id", creds.client_id.as_str()),
            ("client_secret", creds.client_secret.as_str()),
            ("refresh_token", creds.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];

        self.request_token(&self.token_uri, &params).await
    }

    async fn request_token(&self, token_uri: &str, params: &[(&str, &str)]) -> Result<AccessToken> {
        let response = self
            .http_client
            .post(token_uri)
            .form(params)
            .send()
            .await
            .map_err(|e| PortalError::Auth(format!("Token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PortalError::Auth(format!(
                "Token endpoint returned {}: {}",
                status, body
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| PortalError::Auth(format!("Invalid token response: {}", e)))?;

        Ok(token_response.into())
    }
}
